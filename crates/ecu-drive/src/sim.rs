//! Host-side simulation of the collaborators.
//!
//! [`SimBus`] answers every port from plain fields and records everything the
//! controller sends. [`ScriptedPedals`] holds a pedal sample the test or
//! scenario sets directly. [`run_scenario`] replays a list of timed phases at
//! the configured control cadence.

use core::time::Duration;
use std::collections::VecDeque;
use std::path::Path;

use ecu_lut::scale;
use ecu_plausibility::{AdcSpan, PedalCalibration, PedalSensors, PedalStatus, RawPedalSample};
use ecu_torque::{AccelTableUpdate, CoolingDuty, TempLimiting, TorqueRequest};
use serde::{Deserialize, Serialize};

use crate::config::EcuConfig;
use crate::controller::{CycleReport, DriveController, HousekeepingReport};
use crate::error::{EcuError, EcuResult};
use crate::ports::{
    AeroActuator, BatteryPack, BatteryStatus, CalibrationLink, CoolingActuator, MotorController,
    MotorStatus, SafetyCircuit, Telemetry,
};
use crate::state::{AeroPosition, BatteryCommand, BatteryState, DriveState};

/// Everything the controller sent to a [`SimBus`], in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BusLog {
    /// Battery commands.
    pub battery_commands: Vec<BatteryCommand>,
    /// Inverter requests.
    pub torque_requests: Vec<TorqueRequest>,
    /// Cooling duties.
    pub cooling_duties: Vec<CoolingDuty>,
    /// Aero commands.
    pub aero_positions: Vec<AeroPosition>,
    /// Published drive states.
    pub drive_states: Vec<DriveState>,
    /// Published pedal snapshots.
    pub pedal_status: Vec<PedalStatus>,
    /// Published temperature-limiting flags.
    pub temp_limiting: Vec<TempLimiting>,
    /// Responses to accel table updates.
    pub accel_update_responses: Vec<u8>,
}

/// In-memory drive bus.
#[derive(Debug, Clone, Default)]
pub struct SimBus {
    /// Battery report returned to the controller.
    pub battery: BatteryStatus,
    /// Motor report returned to the controller.
    pub motor: MotorStatus,
    /// Safety circuit fault line.
    pub safety_fault: bool,
    /// Coolant temperature in °C.
    pub coolant_c: f32,
    /// Driver aero enable.
    pub aero_enabled: bool,
    /// Accel table updates waiting to be polled.
    pub pending_updates: VecDeque<AccelTableUpdate>,
    /// Recorded outputs.
    pub log: BusLog,
}

impl SimBus {
    /// A bus whose battery reports active and healthy at 25 °C.
    #[must_use]
    pub fn live() -> Self {
        Self {
            battery: BatteryStatus {
                state: BatteryState::Active,
                faulted: false,
                temperature_c: 25,
            },
            motor: MotorStatus {
                speed_rpm: 0,
                igbt_temp_c: 25,
                motor_temp_c: 25,
            },
            coolant_c: 25.0,
            ..Self::default()
        }
    }

    /// Last battery command sent.
    #[must_use]
    pub fn last_battery_command(&self) -> Option<BatteryCommand> {
        self.log.battery_commands.last().copied()
    }

    /// Last torque request sent.
    #[must_use]
    pub fn last_torque_request(&self) -> Option<TorqueRequest> {
        self.log.torque_requests.last().copied()
    }

    /// Last drive state published.
    #[must_use]
    pub fn last_drive_state(&self) -> Option<DriveState> {
        self.log.drive_states.last().copied()
    }
}

impl BatteryPack for SimBus {
    fn battery_status(&self) -> BatteryStatus {
        self.battery
    }

    fn command_battery(&mut self, command: BatteryCommand) {
        self.log.battery_commands.push(command);
    }
}

impl MotorController for SimBus {
    fn motor_status(&self) -> MotorStatus {
        self.motor
    }

    fn request_torque(&mut self, request: TorqueRequest) {
        self.log.torque_requests.push(request);
    }
}

impl SafetyCircuit for SimBus {
    fn safety_fault_present(&self) -> bool {
        self.safety_fault
    }
}

impl CoolingActuator for SimBus {
    fn coolant_temperature_c(&self) -> f32 {
        self.coolant_c
    }

    fn set_cooling_duty(&mut self, duty: CoolingDuty) {
        self.log.cooling_duties.push(duty);
    }
}

impl AeroActuator for SimBus {
    fn aero_enabled(&self) -> bool {
        self.aero_enabled
    }

    fn command_aero(&mut self, position: AeroPosition) {
        self.log.aero_positions.push(position);
    }
}

impl CalibrationLink for SimBus {
    fn poll_accel_update(&mut self) -> Option<AccelTableUpdate> {
        self.pending_updates.pop_front()
    }

    fn respond_accel_update(&mut self, response: u8) {
        self.log.accel_update_responses.push(response);
    }
}

impl Telemetry for SimBus {
    fn publish_drive_state(&mut self, state: DriveState) {
        self.log.drive_states.push(state);
    }

    fn publish_pedal_status(&mut self, status: PedalStatus) {
        self.log.pedal_status.push(status);
    }

    fn publish_temp_limiting(&mut self, limiting: TempLimiting) {
        self.log.temp_limiting.push(limiting);
    }
}

/// Raw ADC reading at `percent` of a span's travel.
#[must_use]
pub fn raw_for_percent(span: AdcSpan, percent: f32, reversed: bool) -> u16 {
    let travel = scale(percent.clamp(0.0, 100.0) / 100.0, span.width());
    if reversed {
        span.max.saturating_sub(travel)
    } else {
        span.min.saturating_add(travel)
    }
}

/// Pedal sensors driven directly by a test or scenario.
#[derive(Debug, Clone)]
pub struct ScriptedPedals {
    calibration: PedalCalibration,
    sample: RawPedalSample,
}

impl ScriptedPedals {
    /// Pedals at rest with a healthy brake circuit.
    #[must_use]
    pub fn new(calibration: PedalCalibration) -> Self {
        let sample = RawPedalSample {
            apps1: calibration.apps1.min,
            apps2: calibration.apps2.max,
            front_brake: calibration.front_brake.min,
            rear_brake: calibration.rear_brake.min,
            brake_circuit_valid: true,
        };
        Self {
            calibration,
            sample,
        }
    }

    /// Current sample.
    #[must_use]
    pub fn current(&self) -> RawPedalSample {
        self.sample
    }

    /// Replace the whole sample.
    pub fn set_sample(&mut self, sample: RawPedalSample) {
        self.sample = sample;
    }

    /// Both accelerator sensors at the same travel.
    pub fn set_throttle_percent(&mut self, percent: f32) {
        self.set_apps_percent(percent, percent);
    }

    /// Each accelerator sensor at its own travel.
    pub fn set_apps_percent(&mut self, apps1: f32, apps2: f32) {
        self.sample.apps1 = raw_for_percent(self.calibration.apps1, apps1, false);
        self.sample.apps2 = raw_for_percent(self.calibration.apps2, apps2, true);
    }

    /// Front and rear brake raw readings.
    pub fn set_brake_raw(&mut self, raw: u16) {
        self.sample.front_brake = raw;
        self.sample.rear_brake = raw;
    }

    /// Hardware brake-circuit-valid line.
    pub fn set_brake_circuit_valid(&mut self, valid: bool) {
        self.sample.brake_circuit_valid = valid;
    }
}

impl PedalSensors for ScriptedPedals {
    fn sample(&mut self) -> RawPedalSample {
        self.sample
    }
}

/// Inputs held for one stretch of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phase {
    /// Label shown in reports.
    pub name: Option<String>,
    /// How long the inputs are held.
    pub duration_ms: u64,
    /// APPS1 travel in percent.
    pub throttle_pct: f32,
    /// APPS2 travel in percent; follows APPS1 when absent.
    pub apps2_pct: Option<f32>,
    /// Front and rear brake raw reading.
    pub brake_raw: u16,
    /// Hardware brake-circuit-valid line.
    pub brake_circuit_valid: bool,
    /// Traction-system-active switch level.
    pub traction_active: bool,
    /// Ready-to-drive switch level.
    pub ready_to_drive: bool,
    /// Battery state.
    pub battery: BatteryState,
    /// Battery fault flag.
    pub battery_faulted: bool,
    /// Battery temperature in °C.
    pub battery_c: i16,
    /// Safety circuit fault line.
    pub safety_fault: bool,
    /// Motor speed in rpm.
    pub speed_rpm: i32,
    /// IGBT temperature in °C.
    pub igbt_c: i16,
    /// Motor temperature in °C.
    pub motor_c: i16,
    /// Coolant temperature in °C.
    pub coolant_c: f32,
    /// Driver aero enable.
    pub aero_enabled: bool,
}

impl Default for Phase {
    fn default() -> Self {
        Self {
            name: None,
            duration_ms: 0,
            throttle_pct: 0.0,
            apps2_pct: None,
            brake_raw: 400,
            brake_circuit_valid: true,
            traction_active: false,
            ready_to_drive: false,
            battery: BatteryState::Shutdown,
            battery_faulted: false,
            battery_c: 25,
            safety_fault: false,
            speed_rpm: 0,
            igbt_c: 25,
            motor_c: 25,
            coolant_c: 25.0,
            aero_enabled: false,
        }
    }
}

impl Phase {
    fn apply(&self, controller: &mut DriveController<ScriptedPedals, SimBus>) {
        let switches = controller.switch_handle();
        switches.set_traction_active(self.traction_active);
        switches.set_ready_to_drive(self.ready_to_drive);

        let pedals = controller.sensors_mut();
        pedals.set_apps_percent(self.throttle_pct, self.apps2_pct.unwrap_or(self.throttle_pct));
        pedals.set_brake_raw(self.brake_raw);
        pedals.set_brake_circuit_valid(self.brake_circuit_valid);

        let bus = controller.bus_mut();
        bus.battery = BatteryStatus {
            state: self.battery,
            faulted: self.battery_faulted,
            temperature_c: self.battery_c,
        };
        bus.motor = MotorStatus {
            speed_rpm: self.speed_rpm,
            igbt_temp_c: self.igbt_c,
            motor_temp_c: self.motor_c,
        };
        bus.safety_fault = self.safety_fault;
        bus.coolant_c = self.coolant_c;
        bus.aero_enabled = self.aero_enabled;
    }
}

/// A sequence of phases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Phases in order.
    pub phases: Vec<Phase>,
}

impl Scenario {
    /// Parse a scenario from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EcuError::Parse`] for malformed JSON.
    pub fn from_json_str(json: &str) -> EcuResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a scenario file.
    ///
    /// # Errors
    ///
    /// Returns [`EcuError::Io`] if the file cannot be read, otherwise as
    /// [`Scenario::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> EcuResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EcuError::io(path, e))?;
        Self::from_json_str(&text)
    }

    /// Sum of phase durations.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.phases
            .iter()
            .fold(Duration::ZERO, |acc, p| acc.saturating_add(Duration::from_millis(p.duration_ms)))
    }
}

/// One control cycle of a replay, tagged with its phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioStep {
    /// Index of the phase that was active.
    pub phase: usize,
    /// Control cycle outcome.
    #[serde(flatten)]
    pub report: CycleReport,
    /// Housekeeping outcome, on cycles where it ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub housekeeping: Option<HousekeepingReport>,
}

/// Result of [`run_scenario`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioRun {
    /// One entry per control cycle.
    pub steps: Vec<ScenarioStep>,
    /// Everything sent to the bus.
    pub log: BusLog,
}

/// Replay `scenario` against a fresh controller built from `config`.
///
/// Time starts at zero and advances by the control period.
///
/// # Errors
///
/// Returns the controller construction error if `config` is invalid.
pub fn run_scenario(config: EcuConfig, scenario: &Scenario) -> EcuResult<ScenarioRun> {
    let pedals = ScriptedPedals::new(config.pedals.clone());
    let period = config.control_period();
    let mut controller = DriveController::new(config, pedals, SimBus::default())?;

    let mut steps = Vec::new();
    let mut now = Duration::ZERO;
    let mut phase_end = Duration::ZERO;
    for (index, phase) in scenario.phases.iter().enumerate() {
        tracing::debug!(phase = index, name = ?phase.name, "Scenario phase");
        phase.apply(&mut controller);
        // Phase boundaries are measured from the scenario start, not from
        // the first cycle of the phase.
        phase_end = phase_end.saturating_add(Duration::from_millis(phase.duration_ms));
        while now < phase_end {
            let tick = controller.tick(now);
            if let Some(report) = tick.control {
                steps.push(ScenarioStep {
                    phase: index,
                    report,
                    housekeeping: tick.housekeeping,
                });
            }
            now = now.saturating_add(period);
        }
    }

    let (_, bus) = controller.into_parts();
    Ok(ScenarioRun {
        steps,
        log: bus.log,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_for_percent_matches_normalization() {
        let span = AdcSpan::new(400, 3700);
        assert_eq!(raw_for_percent(span, 0.0, false), 400);
        assert_eq!(raw_for_percent(span, 50.0, false), 2050);
        assert_eq!(raw_for_percent(span, 30.0, true), 2710);
        assert_eq!(raw_for_percent(span, 150.0, false), 3700);
    }

    #[test]
    fn test_scripted_pedals_start_at_rest() {
        let mut pedals = ScriptedPedals::new(PedalCalibration::default());
        let sample = pedals.sample();
        assert_eq!(sample.apps1, 400);
        assert_eq!(sample.apps2, 3700);
        assert!(sample.brake_circuit_valid);
    }

    #[test]
    fn test_phase_defaults_from_sparse_json() {
        let scenario = match Scenario::from_json_str(r#"{ "phases": [ { "duration_ms": 50 } ] }"#) {
            Ok(s) => s,
            Err(e) => panic!("scenario: {e}"),
        };
        assert_eq!(scenario.phases.len(), 1);
        assert_eq!(scenario.duration(), Duration::from_millis(50));
        assert_eq!(scenario.phases.first().map(|p| p.brake_raw), Some(400));
    }

    #[test]
    fn test_phase_boundaries_track_scenario_time() {
        let scenario = match Scenario::from_json_str(
            r#"{ "phases": [ { "duration_ms": 15 }, { "duration_ms": 15 } ] }"#,
        ) {
            Ok(s) => s,
            Err(e) => panic!("scenario: {e}"),
        };
        let run = match run_scenario(EcuConfig::default(), &scenario) {
            Ok(r) => r,
            Err(e) => panic!("run: {e}"),
        };
        let steps: Vec<(usize, u64)> = run
            .steps
            .iter()
            .map(|s| (s.phase, s.report.time_ms))
            .collect();
        assert_eq!(steps, vec![(0, 0), (0, 10), (1, 20)]);
        assert_eq!(scenario.duration(), Duration::from_millis(30));
    }

    #[test]
    fn test_sim_bus_records_in_order() {
        let mut bus = SimBus::live();
        bus.command_battery(BatteryCommand::PrechargeAndCloseContactors);
        bus.command_battery(BatteryCommand::Shutdown);
        assert_eq!(bus.last_battery_command(), Some(BatteryCommand::Shutdown));
        assert_eq!(bus.log.battery_commands.len(), 2);
        assert!(bus.battery_status().is_active());
    }
}
