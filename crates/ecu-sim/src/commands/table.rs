//! Reference calibration lookups

use anyhow::Result;
use clap::ValueEnum;
use ecu_drive::EcuConfig;
use ecu_lut::{LookupTable, scale};
use ecu_torque::tables::reference;
use ecu_torque::{DEFAULT_CURRENT_LIMIT_MA, DUTY_MAX};
use serde::Serialize;

use crate::commands::TableName;
use crate::error::CliError;
use crate::output;

/// One evaluated table point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableLookup {
    pub table: String,
    pub key: i32,
    pub fraction: f32,
    pub scaled: i32,
    pub full_scale: i32,
    pub unit: &'static str,
}

impl TableName {
    fn pairs(self) -> &'static [(i32, f32)] {
        match self {
            TableName::IgbtDerate => reference::IGBT_DERATE,
            TableName::BatteryDerate => reference::BATTERY_DERATE,
            TableName::MotorDerate => reference::MOTOR_DERATE,
            TableName::SpeedBaseline => reference::SPEED_BASELINE,
            TableName::Accel => reference::ACCEL,
            TableName::Regen => reference::REGEN,
            TableName::MotorPump => reference::MOTOR_PUMP,
            TableName::IgbtPump => reference::IGBT_PUMP,
            TableName::BatteryPump => reference::BATTERY_PUMP,
            TableName::CoolantFan => reference::COOLANT_FAN,
        }
    }

    /// What the fraction is scaled into when the controller uses it.
    fn full_scale(self) -> (i32, &'static str) {
        match self {
            TableName::IgbtDerate
            | TableName::BatteryDerate
            | TableName::MotorDerate
            | TableName::Accel
            | TableName::Regen => (DEFAULT_CURRENT_LIMIT_MA, "mA"),
            TableName::SpeedBaseline => (EcuConfig::default().throttle_max(), "throttle"),
            TableName::MotorPump
            | TableName::IgbtPump
            | TableName::BatteryPump
            | TableName::CoolantFan => (i32::from(DUTY_MAX), "duty"),
        }
    }

    fn label(self) -> String {
        self.to_possible_value()
            .map_or_else(|| format!("{self:?}"), |v| v.get_name().to_owned())
    }
}

pub fn execute(name: TableName, key: i32, json: bool) -> Result<()> {
    let lookup = lookup_reference(name, key)?;
    output::print_table_lookup(&lookup, json);
    Ok(())
}

pub fn lookup_reference(name: TableName, key: i32) -> Result<TableLookup, CliError> {
    let table = LookupTable::from_pairs(name.pairs())?;
    let fraction = table.lookup(key);
    let (full_scale, unit) = name.full_scale();
    tracing::debug!(table = %name.label(), key, fraction, "Reference lookup");
    Ok(TableLookup {
        table: name.label(),
        key,
        fraction,
        scaled: scale(fraction, full_scale),
        full_scale,
        unit,
    })
}
