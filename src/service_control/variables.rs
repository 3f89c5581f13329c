//! Names of the simulation variables read and written by the coordinators.
//!
//! `L:FSDT_GSX_*` variables belong to the ground handling automation, the
//! dotted names to the flight-management simulation interface.

pub const FUEL_HOSE_CONNECTED: &str = "L:FSDT_GSX_FUELHOSE_CONNECTED";
pub const MENU_OPEN: &str = "L:FSDT_GSX_MENU_OPEN";
pub const MENU_READY: &str = "L:FSDT_GSX_MENU_READY";
pub const MENU_CHOICE: &str = "L:FSDT_GSX_MENU_CHOICE";
pub const GSX_PASSENGERS: &str = "L:FSDT_GSX_NUMPASSENGERS";
pub const BOARDING_PAX: &str = "L:FSDT_GSX_NUMPASSENGERS_BOARDING_TOTAL";
pub const DEBOARDING_PAX: &str = "L:FSDT_GSX_NUMPASSENGERS_DEBOARDING_TOTAL";
pub const BOARDING_CARGO_PERCENT: &str = "L:FSDT_GSX_BOARDING_CARGO_PERCENT";
pub const DEBOARDING_CARGO_PERCENT: &str = "L:FSDT_GSX_DEBOARDING_CARGO_PERCENT";

pub const FUEL_TOTAL_KG: &str = "aircraft.fuel.total.kg";
pub const FUEL_TARGET_KG: &str = "aircraft.fuel.target.kg";
pub const PAX_CURRENT: &str = "aircraft.payload.pax.current";
pub const PAX_PLANNED: &str = "aircraft.payload.pax.planned";
pub const CARGO_CURRENT_KG: &str = "aircraft.payload.cargo.current.kg";
pub const CARGO_PLANNED_KG: &str = "aircraft.payload.cargo.planned.kg";
pub const HYD_RESERVOIRS: [&str; 3] = [
    "aircraft.hydraulics.blue.quantity",
    "aircraft.hydraulics.green.quantity",
    "aircraft.hydraulics.yellow.quantity",
];
pub const GROUND_POWER: &str = "groundservice.groundpower";
pub const PRECONDITIONED_AIR: &str = "groundservice.preconditionedAir";
pub const CHOCKS: &str = "efb.chocks";
pub const SERVICE_DOORS: [&str; 2] = ["doors.service.fwd", "doors.service.aft"];
pub const CARGO_DOORS: [&str; 2] = ["doors.cargo.fwd", "doors.cargo.aft"];
