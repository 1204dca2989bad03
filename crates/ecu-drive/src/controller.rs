//! The drive controller: one object owning every component.
//!
//! Two tasks run on absolute deadlines from a caller-supplied monotonic
//! clock:
//!
//! - the control cycle (10 ms): sensors, fault checks, switches, upstream
//!   status, state machine, outputs, always in that order;
//! - housekeeping (100 ms): cooling duty, pedal and temperature telemetry,
//!   calibration link.
//!
//! # RT Safety
//!
//! The control cycle is allocation free. Housekeeping may allocate while
//! installing or reverting an accel table. Errors are only possible in
//! [`DriveController::new`].

use core::time::Duration;

use ecu_plausibility::{FaultFlags, PedalPlausibility, PedalSensors};
use ecu_torque::{
    ComponentTemps, CoolingDuty, CoolingEngine, CoolingInputs, TempLimiting, TorqueEngine,
    TorqueInputs, TorqueRequest,
};
use serde::Serialize;

use crate::aero::ActiveAero;
use crate::config::EcuConfig;
use crate::error::EcuResult;
use crate::fsm::{DriveInputs, DriveStateMachine, Transition};
use crate::ports::DriveBus;
use crate::state::{AeroPosition, BatteryCommand, DriveState};
use crate::switches::{SwitchHandle, SwitchLatches, SwitchPanel};

/// Fixed-period deadline tracker.
///
/// Deadlines advance by exactly one period so the schedule does not drift.
/// If a whole period is missed the next deadline is re-anchored at
/// `now + period` instead of replaying the backlog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    period: Duration,
    next: Duration,
}

impl Cadence {
    /// A cadence whose first deadline is at time zero.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self::starting_at(period, Duration::ZERO)
    }

    /// A cadence whose first deadline is `start`.
    #[must_use]
    pub fn starting_at(period: Duration, start: Duration) -> Self {
        Self {
            period,
            next: start,
        }
    }

    /// Period between deadlines.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Next deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Duration {
        self.next
    }

    /// Returns true and advances the deadline if `now` has reached it.
    pub fn poll(&mut self, now: Duration) -> bool {
        if now < self.next {
            return false;
        }
        let next = self.next.saturating_add(self.period);
        self.next = if next <= now {
            tracing::debug!(
                late_us = u64::try_from(now.saturating_sub(self.next).as_micros()).unwrap_or(u64::MAX),
                "Cadence overrun, resynchronizing"
            );
            now.saturating_add(self.period)
        } else {
            next
        };
        true
    }
}

/// Outcome of one control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CycleReport {
    /// Cycle time in milliseconds since boot.
    pub time_ms: u64,
    /// State after the transition check.
    pub state: DriveState,
    /// Transition taken this cycle, if any.
    pub transition: Option<Transition>,
    /// Request sent to the inverter.
    pub torque: TorqueRequest,
    /// Request the torque engine computed before state and fault gating.
    pub computed: TorqueRequest,
    /// Command sent to the battery pack.
    pub battery_command: BatteryCommand,
    /// Pedal fault flags for this cycle.
    pub faults: FaultFlags,
    /// Resolved throttle.
    pub throttle: i32,
    /// Brake pressed.
    pub brake_pressed: bool,
    /// Flap position commanded.
    pub aero: AeroPosition,
}

/// Outcome of one housekeeping pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HousekeepingReport {
    /// Duty sent to the cooling actuator.
    pub cooling: CoolingDuty,
    /// Components limiting torque.
    pub temp_limiting: TempLimiting,
    /// Response sent for an accel table update, if one was pending.
    pub accel_update_response: Option<u8>,
}

/// What ran during one [`DriveController::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tick {
    /// Control cycle report, if the control task was due.
    pub control: Option<CycleReport>,
    /// Housekeeping report, if housekeeping was due.
    pub housekeeping: Option<HousekeepingReport>,
}

/// Owns the pedal subsystem, both engines, the state machine and the
/// collaborators, and drives them on their cadences.
#[derive(Debug)]
pub struct DriveController<S, B> {
    config: EcuConfig,
    pedals: PedalPlausibility,
    torque: TorqueEngine,
    cooling: CoolingEngine,
    aero: ActiveAero,
    fsm: DriveStateMachine,
    switches: SwitchPanel,
    latches: SwitchLatches,
    control: Cadence,
    housekeeping: Cadence,
    temps: ComponentTemps,
    sensors: S,
    bus: B,
}

impl<S: PedalSensors, B: DriveBus> DriveController<S, B> {
    /// Validate `config`, build every component and start in OFF.
    ///
    /// # Errors
    ///
    /// Returns the first configuration or calibration error. A controller
    /// that fails here never reaches a state that can drive.
    pub fn new(config: EcuConfig, sensors: S, bus: B) -> EcuResult<Self> {
        config.validate()?;
        let calibration = config.calibration()?;

        let pedals = PedalPlausibility::new(config.pedals.clone(), config.plausibility.clone())?;
        let torque =
            TorqueEngine::new(calibration.torque, config.current_limits, config.throttle_max())?;
        let cooling = CoolingEngine::new(calibration.cooling, config.duty_max)?;
        let aero = ActiveAero::new(&config.aero, config.current_limits.accel_max_ma);

        tracing::info!(
            control_ms = config.control_period_ms,
            housekeeping_ms = config.housekeeping_period_ms,
            throttle_max = config.throttle_max(),
            custom_tables = config.tables.is_some(),
            "Drive controller initialized"
        );

        Ok(Self {
            control: Cadence::new(config.control_period()),
            housekeeping: Cadence::new(config.housekeeping_period()),
            config,
            pedals,
            torque,
            cooling,
            aero,
            fsm: DriveStateMachine::new(),
            switches: SwitchPanel::new(),
            latches: SwitchLatches::new(),
            temps: ComponentTemps::default(),
            sensors,
            bus,
        })
    }

    /// Run whichever tasks are due at `now`, control first.
    pub fn tick(&mut self, now: Duration) -> Tick {
        let control = self
            .control
            .poll(now)
            .then(|| self.run_control_cycle(now));
        let housekeeping = self.housekeeping.poll(now).then(|| self.run_housekeeping());
        Tick {
            control,
            housekeeping,
        }
    }

    /// One control cycle.
    pub fn run_control_cycle(&mut self, now: Duration) -> CycleReport {
        // Sensors strictly before fault checks, fault checks strictly
        // before anything reads the aggregate flag.
        self.pedals.update_sensor_values(&mut self.sensors);
        let faults = self.pedals.check_for_implausibilities(now);
        let brake_pressed = self.pedals.is_brake_pressed();

        self.latches
            .update(self.switches.levels(), brake_pressed, self.fsm.state());

        let battery = self.bus.battery_status();
        let motor = self.bus.motor_status();
        let safety_fault = self.bus.safety_fault_present();
        self.temps = ComponentTemps::new(motor.igbt_temp_c, battery.temperature_c, motor.motor_temp_c);

        let transition = self.fsm.step(&DriveInputs {
            traction_active: self.latches.traction_active(),
            ready_to_drive: self.latches.ready_to_drive(),
            battery_active: battery.is_active(),
            battery_fault: battery.is_faulted(),
            safety_fault,
        });
        if transition.is_some_and(|t| t.to == DriveState::Off) {
            self.latches.drop_all();
        }

        let state = self.fsm.state();
        let battery_command = match state {
            DriveState::Off
                if self.latches.traction_active() && !battery.is_faulted() && !safety_fault =>
            {
                BatteryCommand::PrechargeAndCloseContactors
            }
            DriveState::Off => BatteryCommand::Shutdown,
            DriveState::Neutral | DriveState::Drive => BatteryCommand::PrechargeAndCloseContactors,
        };

        let throttle = self.pedals.get_throttle();
        let computed = self.torque.compute(&TorqueInputs {
            throttle,
            speed_rpm: motor.speed_rpm,
            brake_pressed,
            temps: self.temps,
        });
        let torque = if state.allows_torque() && !self.pedals.is_implausibility_present() {
            computed
        } else {
            TorqueRequest::ZERO
        };
        let aero = self
            .aero
            .position(self.bus.aero_enabled(), state, brake_pressed, torque);

        self.bus.command_battery(battery_command);
        self.bus.request_torque(torque);
        self.bus.command_aero(aero);
        self.bus.publish_drive_state(state);

        CycleReport {
            time_ms: u64::try_from(now.as_millis()).unwrap_or(u64::MAX),
            state,
            transition,
            torque,
            computed,
            battery_command,
            faults,
            throttle,
            brake_pressed,
            aero,
        }
    }

    /// One housekeeping pass.
    pub fn run_housekeeping(&mut self) -> HousekeepingReport {
        let cooling = self.cooling.duty(&CoolingInputs {
            motor_c: self.temps.motor_c,
            igbt_c: self.temps.igbt_c,
            battery_c: self.temps.battery_c,
            coolant_c: self.bus.coolant_temperature_c(),
        });
        self.bus.set_cooling_duty(cooling);

        self.bus.publish_pedal_status(self.pedals.status());

        let temp_limiting = self.torque.thermal_derate(self.temps).limiting();
        self.bus.publish_temp_limiting(temp_limiting);

        let accel_update_response = match self.bus.poll_accel_update() {
            Some(update) => {
                let response = self.torque.apply_accel_update(update);
                self.bus.respond_accel_update(response);
                Some(response)
            }
            None => None,
        };

        HousekeepingReport {
            cooling,
            temp_limiting,
            accel_update_response,
        }
    }

    /// Handle for switch edge handlers.
    #[must_use]
    pub fn switch_handle(&self) -> SwitchHandle {
        self.switches.handle()
    }

    /// Current drive state.
    #[must_use]
    pub fn state(&self) -> DriveState {
        self.fsm.state()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EcuConfig {
        &self.config
    }

    /// Pedal subsystem.
    #[must_use]
    pub fn pedals(&self) -> &PedalPlausibility {
        &self.pedals
    }

    /// Torque engine.
    #[must_use]
    pub fn torque_engine(&self) -> &TorqueEngine {
        &self.torque
    }

    /// Switch latches after the last control cycle.
    #[must_use]
    pub fn latches(&self) -> SwitchLatches {
        self.latches
    }

    /// Pedal sensors.
    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    /// Collaborator bus.
    #[must_use]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Collaborator bus.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Give back the sensors and the bus.
    pub fn into_parts(self) -> (S, B) {
        (self.sensors, self.bus)
    }
}
