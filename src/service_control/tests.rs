use super::loadsheet::GenerationState;
use super::*;
use crate::mock::{FakeAutomation, FakeLoadsheetServer};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strum::IntoEnumIterator;
use tokio::time::Instant;

#[test]
fn test_service_state_codes() {
    let expected = [
        ServiceState::Unavailable,
        ServiceState::Bypassed,
        ServiceState::Disconnected,
        ServiceState::Available,
        ServiceState::Requested,
        ServiceState::Active,
        ServiceState::Completed,
    ];
    for (code, state) in expected.iter().enumerate() {
        let code = f64::from(u8::try_from(code).unwrap());
        assert_eq!(ServiceState::try_from(code), Ok(*state));
        assert!((f64::from(*state) - code).abs() < f64::EPSILON);
    }
    assert!(ServiceState::try_from(7.0).is_err());
    assert!(ServiceState::try_from(4.5).is_err());
    assert!(ServiceState::try_from(-1.0).is_err());
    assert!(ServiceState::Active.is_at_least_requested());
    assert!(!ServiceState::Available.is_at_least_requested());
}

#[test]
fn test_state_vars_are_unique() {
    for service in GroundService::iter() {
        assert_eq!(GroundService::from_state_var(service.state_var()), Some(service));
    }
    assert_eq!(GroundService::from_state_var("L:SOMETHING_ELSE"), None);
}

#[tokio::test]
async fn test_select_menu_item_is_one_based() {
    let adapter = FakeAutomation::new();
    adapter.select_menu_item(4).await.unwrap();
    assert!((adapter.get(variables::MENU_CHOICE) - 3.0).abs() < f64::EPSILON);
    assert_eq!(adapter.select_menu_item(0).await, Err(AdapterError::InvalidMenuIndex { index: 0 }));
}

#[tokio::test]
async fn test_menu_channel_runs_steps_without_blocking() {
    let adapter = FakeAutomation::new();
    let mut menu = MenuCommandChannel::new();
    let t0 = Instant::now();
    menu.submit(MenuCommand::RequestBoarding, t0).unwrap();
    assert_eq!(
        menu.submit(MenuCommand::RequestRefuel, t0),
        Err(MenuError::Busy { running: MenuCommand::RequestBoarding })
    );

    assert_eq!(menu.advance(&adapter, t0).await, MenuProgress::Waiting);
    assert_eq!(adapter.writes_to(variables::MENU_OPEN), 1);
    assert_eq!(menu.resume_at(), Some(t0 + Duration::from_millis(50)));

    // not yet due
    assert_eq!(menu.advance(&adapter, t0 + Duration::from_millis(10)).await, MenuProgress::Waiting);
    assert_eq!(adapter.write_count(), 1);

    let t1 = t0 + Duration::from_millis(50);
    assert_eq!(menu.advance(&adapter, t1).await, MenuProgress::Waiting);
    assert_eq!(adapter.selections_of(4), 1);

    let t2 = t1 + Duration::from_millis(500);
    assert_eq!(menu.advance(&adapter, t2).await, MenuProgress::Completed(MenuCommand::RequestBoarding));
    assert!(menu.is_idle());
    assert_eq!(menu.advance(&adapter, t2).await, MenuProgress::Idle);
}

#[tokio::test]
async fn test_menu_channel_times_out_when_menu_never_ready() {
    let adapter = FakeAutomation::new();
    adapter.set(variables::MENU_READY, 0.0);
    let mut menu = MenuCommandChannel::new();
    let t0 = Instant::now();
    menu.submit(MenuCommand::ToggleJetway, t0).unwrap();
    menu.advance(&adapter, t0).await;
    let t1 = t0 + Duration::from_millis(50);
    assert_eq!(menu.advance(&adapter, t1).await, MenuProgress::Waiting);
    assert_eq!(menu.advance(&adapter, t1 + Duration::from_secs(2)).await, MenuProgress::Waiting);
    assert_eq!(
        menu.advance(&adapter, t1 + Duration::from_secs(5)).await,
        MenuProgress::Failed(MenuCommand::ToggleJetway, MenuError::NotReady { command: MenuCommand::ToggleJetway })
    );
    assert!(menu.is_idle());
    assert_eq!(adapter.writes_to(variables::MENU_CHOICE), 0);
}

/// Runs the in-flight menu command to its end.
async fn drain(menu: &mut MenuCommandChannel, adapter: &dyn AutomationAdapter) -> MenuProgress {
    for _ in 0..128 {
        let Some(at) = menu.resume_at() else { return MenuProgress::Idle };
        match menu.advance(adapter, at).await {
            MenuProgress::Waiting => {}
            done => return done,
        }
    }
    MenuProgress::Waiting
}

#[tokio::test]
async fn test_initial_fuel_never_exceeds_target() {
    let adapter = FakeAutomation::new();
    let mut refuel = RefuelingCoordinator::new(28.0, 0.98);
    refuel.set_target(&adapter, 7400.0).await.unwrap();
    assert!(refuel.target_matches(7400.0));
    assert!(!refuel.target_matches(7300.0));

    adapter.set(variables::FUEL_TOTAL_KG, 9100.0);
    refuel.set_initial_fuel(&adapter).await.unwrap();
    assert!((adapter.get(variables::FUEL_TOTAL_KG) - 7400.0).abs() < f64::EPSILON);

    adapter.set(variables::FUEL_TOTAL_KG, 2000.0);
    refuel.set_initial_fuel(&adapter).await.unwrap();
    assert!((refuel.state().current_kg - 2000.0).abs() < f64::EPSILON);

    refuel.set_hydraulic_fluid_levels(&adapter).await.unwrap();
    for reservoir in variables::HYD_RESERVOIRS {
        assert!((adapter.get(reservoir) - 0.98).abs() < f64::EPSILON);
    }
}

#[tokio::test]
async fn test_refuel_fill_pause_and_forced_stop() {
    let adapter = FakeAutomation::new();
    let mut menu = MenuCommandChannel::new();
    let mut refuel = RefuelingCoordinator::new(20.0, 0.98);
    refuel.set_target(&adapter, 1000.0).await.unwrap();
    refuel.set_initial_fuel(&adapter).await.unwrap();

    assert!(!refuel.set_active());
    refuel.request_refueling(&mut menu, Instant::now()).unwrap();
    // latched, no second submission even though the menu is busy
    refuel.request_refueling(&mut menu, Instant::now()).unwrap();
    assert!(refuel.set_active());

    let dt = Duration::from_secs(1);
    assert!(!refuel.process_refueling(&adapter, dt).await.unwrap());
    assert!((refuel.state().current_kg - 20.0).abs() < f64::EPSILON);

    refuel.pause();
    assert!(refuel.is_paused());
    refuel.process_refueling(&adapter, dt).await.unwrap();
    assert!((refuel.state().current_kg - 20.0).abs() < f64::EPSILON);
    assert!(refuel.is_requested() && refuel.is_active());

    refuel.resume();
    refuel.process_refueling(&adapter, dt).await.unwrap();
    assert!((refuel.state().current_kg - 40.0).abs() < f64::EPSILON);

    // truck reports completion long before the fill model
    refuel.stop_refueling(&adapter).await.unwrap();
    assert!(refuel.is_complete());
    assert!((adapter.get(variables::FUEL_TOTAL_KG) - 1000.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_refuel_fill_clamps_to_target() {
    let adapter = FakeAutomation::new();
    let mut menu = MenuCommandChannel::new();
    let mut refuel = RefuelingCoordinator::new(28.0, 0.98);
    refuel.set_target(&adapter, 50.0).await.unwrap();
    refuel.request_refueling(&mut menu, Instant::now()).unwrap();
    refuel.set_active();
    assert!(!refuel.process_refueling(&adapter, Duration::from_secs(1)).await.unwrap());
    assert!(refuel.process_refueling(&adapter, Duration::from_secs(1)).await.unwrap());
    assert!((adapter.get(variables::FUEL_TOTAL_KG) - 50.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_failed_refuel_request_can_be_retried() {
    let adapter = FakeAutomation::new();
    adapter.set(variables::MENU_READY, 0.0);
    let mut menu = MenuCommandChannel::new();
    let mut refuel = RefuelingCoordinator::new(28.0, 0.98);
    refuel.request_refueling(&mut menu, Instant::now()).unwrap();
    let res = drain(&mut menu, &adapter).await;
    assert!(matches!(res, MenuProgress::Failed(MenuCommand::RequestRefuel, _)));
    refuel.on_request_failed();
    assert!(!refuel.is_requested());
}

#[tokio::test]
async fn test_boarding_follows_external_state() {
    let adapter = FakeAutomation::new();
    let mut boarding = BoardingCoordinator::new();
    boarding.set_passengers(&adapter, 120).await.unwrap();
    assert!((adapter.get(variables::GSX_PASSENGERS) - 120.0).abs() < f64::EPSILON);

    assert!(!boarding.update_boarding_state(ServiceState::Available));
    assert!(!boarding.boarding().active);
    assert!(boarding.update_boarding_state(ServiceState::Requested));
    assert!(boarding.boarding().requested && boarding.boarding().active);
    assert!(!boarding.update_boarding_state(ServiceState::Active));

    assert!(!boarding.process_boarding(&adapter, 60, 40.0).await.unwrap());
    assert!((adapter.get(variables::PAX_CURRENT) - 60.0).abs() < f64::EPSILON);
    assert!(!boarding.process_boarding(&adapter, 120, 90.0).await.unwrap());
    assert!(boarding.process_boarding(&adapter, 125, 100.0).await.unwrap());
    assert_eq!(boarding.boarding().current, 120);
    boarding.stop_boarding();
    assert!(boarding.boarding().complete && !boarding.boarding().active);
}

#[tokio::test]
async fn test_deboarding_empties_the_cabin() {
    let adapter = FakeAutomation::new();
    let mut boarding = BoardingCoordinator::new();
    boarding.set_passengers(&adapter, 100).await.unwrap();
    boarding.update_deboarding_state(ServiceState::Active);
    boarding.process_deboarding(&adapter, 30, 10.0).await.unwrap();
    assert!((adapter.get(variables::PAX_CURRENT) - 70.0).abs() < f64::EPSILON);
    assert!(boarding.process_deboarding(&adapter, 100, 100.0).await.unwrap());
    assert!(adapter.get(variables::PAX_CURRENT).abs() < f64::EPSILON);
    boarding.reset();
    assert_eq!(boarding.deboarding().planned, 100);
    assert!(!boarding.deboarding().complete);
}

#[tokio::test]
async fn test_catering_operates_service_doors() {
    let adapter = FakeAutomation::new();
    let mut catering = CateringCoordinator::new();
    catering.update(&adapter, ServiceState::Requested).await.unwrap();
    assert!(!catering.doors_open());
    catering.update(&adapter, ServiceState::Active).await.unwrap();
    assert!(catering.is_active() && catering.doors_open());
    for door in variables::SERVICE_DOORS {
        assert!(adapter.get(door) > 0.5);
    }
    catering.update(&adapter, ServiceState::Completed).await.unwrap();
    assert!(catering.is_complete() && !catering.doors_open());
    for door in variables::SERVICE_DOORS {
        assert!(adapter.get(door) < 0.5);
    }
}

#[tokio::test]
async fn test_cargo_doors_follow_progress() {
    let adapter = FakeAutomation::new();
    let mut cargo = CargoCoordinator::new();
    cargo.set_target(&adapter, 2000.0).await.unwrap();
    assert!(!cargo.update_loading(&adapter, 50.0).await.unwrap());
    assert!(cargo.doors_open());
    assert!((adapter.get(variables::CARGO_CURRENT_KG) - 1000.0).abs() < f64::EPSILON);
    assert!(cargo.update_loading(&adapter, 100.0).await.unwrap());
    assert!(!cargo.doors_open());
    assert!(cargo.update_unloading(&adapter, 25.0).await.is_ok_and(|done| !done));
    assert!((adapter.get(variables::CARGO_CURRENT_KG) - 1500.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_disconnect_all_is_idempotent() {
    let adapter = FakeAutomation::new();
    let equipment = EquipmentCoordinator::new();
    assert!(equipment.connect_gpu(&adapter).await.unwrap());
    assert!(!equipment.connect_gpu(&adapter).await.unwrap());
    equipment.connect_pca(&adapter).await.unwrap();
    equipment.set_chocks(&adapter, true).await.unwrap();

    assert!(equipment.disconnect_all_ground_services(&adapter).await.unwrap());
    let writes = adapter.write_count();
    assert!(!equipment.disconnect_all_ground_services(&adapter).await.unwrap());
    assert_eq!(adapter.write_count(), writes);
}

#[tokio::test]
async fn test_jetway_removal_waits_for_movement_and_latches() {
    let adapter = FakeAutomation::new();
    let mut menu = MenuCommandChannel::new();
    let mut equipment = EquipmentCoordinator::new();
    adapter.set_state(GroundService::Jetway, ServiceState::Active);
    adapter.set_state(GroundService::JetwayOperation, ServiceState::Active);

    let now = Instant::now();
    assert_eq!(equipment.remove_jetway_stairs(&adapter, &mut menu, now).await, Ok(RemovalOutcome::Skipped));
    assert!(menu.is_idle());

    adapter.set_state(GroundService::JetwayOperation, ServiceState::Completed);
    assert_eq!(
        equipment.remove_jetway_stairs(&adapter, &mut menu, now).await,
        Ok(RemovalOutcome::Issued(MenuCommand::ToggleJetway))
    );
    drain(&mut menu, &adapter).await;
    assert_eq!(adapter.selections_of(6), 1);

    // the jetway still reports connected, a second removal issues nothing
    assert_eq!(equipment.remove_jetway_stairs(&adapter, &mut menu, now).await, Ok(RemovalOutcome::Clear));
    assert!(menu.is_idle());
    assert_eq!(adapter.selections_of(6), 1);
}

#[tokio::test]
async fn test_jetway_and_stairs_are_called_once() {
    let adapter = FakeAutomation::new();
    let mut menu = MenuCommandChannel::new();
    let mut equipment = EquipmentCoordinator::new();
    adapter.set_state(GroundService::Jetway, ServiceState::Available);
    adapter.set_state(GroundService::Stairs, ServiceState::Available);
    let now = Instant::now();

    let first = equipment.call_jetway_stairs(&adapter, &mut menu, now, false).await.unwrap();
    assert_eq!(first, Some(MenuCommand::ToggleJetway));
    drain(&mut menu, &adapter).await;
    let second = equipment.call_jetway_stairs(&adapter, &mut menu, now, false).await.unwrap();
    assert_eq!(second, Some(MenuCommand::ToggleStairs));
    assert!(equipment.on_toggle_failed(MenuCommand::ToggleStairs));
    drain(&mut menu, &adapter).await;
    assert_eq!(
        equipment.call_jetway_stairs(&adapter, &mut menu, now, false).await.unwrap(),
        Some(MenuCommand::ToggleStairs)
    );
    drain(&mut menu, &adapter).await;
    assert_eq!(equipment.call_jetway_stairs(&adapter, &mut menu, now, false).await.unwrap(), None);
}

async fn settle(coord: &mut LoadsheetCoordinator, kind: LoadsheetKind) {
    for _ in 0..10 {
        tokio::task::yield_now().await;
        coord.poll();
        if coord.record(kind).is_settled() {
            return;
        }
    }
}

#[tokio::test]
async fn test_loadsheet_generation_is_latched() {
    let server = Arc::new(FakeLoadsheetServer::new());
    let mut coord = LoadsheetCoordinator::new();
    assert!(coord.request_generation(LoadsheetKind::Preliminary, server.clone(), "OFP-1"));
    assert!(!coord.request_generation(LoadsheetKind::Preliminary, server.clone(), "OFP-1"));
    assert_eq!(*coord.record(LoadsheetKind::Preliminary).state(), GenerationState::Pending);
    settle(&mut coord, LoadsheetKind::Preliminary).await;
    assert!(coord.record(LoadsheetKind::Preliminary).is_sent());
    assert_eq!(server.generated(LoadsheetKind::Preliminary), 1);
    assert!(!coord.record(LoadsheetKind::Final).is_requested());
}

#[tokio::test]
async fn test_loadsheet_failures_are_distinguished_and_not_retried() {
    let server = Arc::new(FakeLoadsheetServer::new());
    server.set_outcome(Ok(LoadsheetResponse::new(false, Some("ZFW exceeds MZFW"), None)));
    let mut coord = LoadsheetCoordinator::new();
    coord.request_generation(LoadsheetKind::Final, server.clone(), "OFP-1");
    settle(&mut coord, LoadsheetKind::Final).await;
    assert_eq!(
        *coord.record(LoadsheetKind::Final).state(),
        GenerationState::Failed(LoadsheetError::Rejected { message: String::from("ZFW exceeds MZFW") })
    );
    for _ in 0..5 {
        coord.poll();
        assert!(!coord.request_generation(LoadsheetKind::Final, server.clone(), "OFP-1"));
    }
    assert_eq!(server.generated(LoadsheetKind::Final), 1);

    assert!(coord.retrigger(LoadsheetKind::Final));
    assert!(!coord.retrigger(LoadsheetKind::Final));
    server.set_outcome(Err(LoadsheetError::Transport { reason: String::from("connection reset") }));
    coord.request_generation(LoadsheetKind::Final, server.clone(), "OFP-1");
    settle(&mut coord, LoadsheetKind::Final).await;
    assert!(matches!(
        coord.record(LoadsheetKind::Final).state(),
        GenerationState::Failed(LoadsheetError::Transport { .. })
    ));
}

#[tokio::test]
async fn test_unavailable_server_is_not_asked_to_generate() {
    let server = Arc::new(FakeLoadsheetServer::new());
    server.set_available(false);
    let mut coord = LoadsheetCoordinator::new();
    coord.request_generation(LoadsheetKind::Preliminary, server.clone(), "OFP-1");
    settle(&mut coord, LoadsheetKind::Preliminary).await;
    assert_eq!(
        *coord.record(LoadsheetKind::Preliminary).state(),
        GenerationState::Failed(LoadsheetError::ServerUnavailable)
    );
    assert_eq!(server.status_checks(), 1);
    assert_eq!(server.generated(LoadsheetKind::Preliminary), 0);
}

#[tokio::test]
async fn test_variable_watch_reports_typed_changes() {
    let adapter = FakeAutomation::new();
    let var = GroundService::Refuel.state_var();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut watch = VariableWatch::new(&[var]);
    let sink = Arc::clone(&seen);
    watch.subscribe(Box::new(move |change: &VariableChange| sink.lock().unwrap().push(*change)));

    assert!(watch.poll(&adapter).await.is_empty());
    adapter.set_state(GroundService::Refuel, ServiceState::Active);
    let changes = watch.poll(&adapter).await;
    assert_eq!(changes, vec![VariableChange { var, old: 0.0, new: 5.0 }]);
    assert!(watch.poll(&adapter).await.is_empty());
    assert_eq!(seen.lock().unwrap().len(), 1);
}
