use chrono::NaiveDate;
use paddock_core::{Farm, RepoError, SimulationConfig};

fn farm() -> Farm {
    Farm::open_in_memory(SimulationConfig::default()).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn add_mob(farm: &Farm, id: i64, paddock_id: Option<i64>, head: usize) {
    let conn = farm.connection();
    conn.execute(
        "INSERT INTO mobs (id, name, paddock_id) VALUES (?1, ?2, ?3);",
        rusqlite::params![id, format!("Mob {id}"), paddock_id],
    )
    .unwrap();
    for _ in 0..head {
        conn.execute("INSERT INTO stock (mob_id) VALUES (?1);", [id])
            .unwrap();
    }
}

#[test]
fn empty_store_starts_at_configured_date() {
    let config = SimulationConfig {
        start_date: date(2025, 3, 1),
        ..SimulationConfig::default()
    };
    let farm = Farm::open_in_memory(config).unwrap();

    assert_eq!(farm.current_date().unwrap(), date(2025, 3, 1));
    assert_eq!(farm.current_date().unwrap(), date(2025, 3, 1));
}

#[test]
fn ungrazed_paddock_grows_by_area_times_rate() {
    let farm = farm();
    let id = farm.add_paddock("Flat", 10.0, 100.0).unwrap();

    let report = farm.advance_day().unwrap();
    assert_eq!(report.updates.len(), 1);

    let paddock = farm.get_paddock(id).unwrap().unwrap();
    assert_eq!(paddock.dm_per_ha, 750.0);
    assert_eq!(paddock.total_dm, 7500.0);
}

#[test]
fn grazing_mob_consumes_per_head() {
    let farm = farm();
    let id = farm.add_paddock("Cow Pasture", 5.0, 2200.0).unwrap();
    add_mob(&farm, 1, Some(id), 4);

    let report = farm.advance_day().unwrap();
    let update = report.updates[0];
    assert_eq!(update.stock_count, 4);
    assert_eq!(update.growth, 325.0);
    assert_eq!(update.consumption, 56.0);

    let paddock = farm.get_paddock(id).unwrap().unwrap();
    assert_eq!(paddock.dm_per_ha, 2469.0);
    assert_eq!(paddock.total_dm, 12345.0);
}

#[test]
fn overgrazing_clamps_density_to_zero() {
    let farm = farm();
    let id = farm.add_paddock("Tiny", 0.1, 5.0).unwrap();
    add_mob(&farm, 1, Some(id), 10);

    farm.advance_day().unwrap();
    let paddock = farm.get_paddock(id).unwrap().unwrap();
    assert_eq!(paddock.dm_per_ha, 0.0);
    assert_eq!(paddock.total_dm, 0.0);

    farm.advance_day().unwrap();
    let paddock = farm.get_paddock(id).unwrap().unwrap();
    assert_eq!(paddock.dm_per_ha, 0.0);
}

#[test]
fn unassigned_mob_does_not_graze() {
    let farm = farm();
    let id = farm.add_paddock("Barn", 2.0, 0.0).unwrap();
    add_mob(&farm, 1, None, 50);

    farm.advance_day().unwrap();
    let paddock = farm.get_paddock(id).unwrap().unwrap();
    assert_eq!(paddock.dm_per_ha, 130.0);
}

#[test]
fn stock_counts_follow_current_assignment_each_day() {
    let farm = farm();
    let hill = farm.add_paddock("Hill", 1.0, 1000.0).unwrap();
    let river = farm.add_paddock("River", 1.0, 1000.0).unwrap();
    add_mob(&farm, 1, Some(hill), 5);

    farm.advance_day().unwrap();
    assert_eq!(farm.get_paddock(hill).unwrap().unwrap().dm_per_ha, 995.0);

    farm.move_mob(1, river).unwrap();
    farm.advance_day().unwrap();
    assert_eq!(farm.get_paddock(hill).unwrap().unwrap().dm_per_ha, 1060.0);
    assert_eq!(farm.get_paddock(river).unwrap().unwrap().dm_per_ha, 1060.0);
}

#[test]
fn each_advance_moves_date_by_one_day() {
    let farm = farm();
    assert_eq!(farm.current_date().unwrap(), date(2024, 11, 15));

    let report = farm.advance_day().unwrap();
    assert_eq!(report.previous_date, date(2024, 11, 15));
    assert_eq!(report.date, date(2024, 11, 16));

    for _ in 0..16 {
        farm.advance_day().unwrap();
    }
    assert_eq!(farm.current_date().unwrap(), date(2024, 12, 2));
}

#[test]
fn derived_total_and_non_negative_density_hold_for_every_paddock() {
    let farm = farm();
    farm.reset_to_baseline().unwrap();
    farm.move_mob(5, 7).unwrap();

    for _ in 0..30 {
        farm.advance_day().unwrap();
        for paddock in farm.list_paddocks().unwrap() {
            assert!(paddock.dm_per_ha >= 0.0, "{} went negative", paddock.name);
            assert!(
                (paddock.total_dm - paddock.area * paddock.dm_per_ha).abs() < 1e-6,
                "{} total drifted",
                paddock.name
            );
        }
    }
}

#[test]
fn rates_come_from_config() {
    let config = SimulationConfig::default().with_rates(0.0, 0.0);
    let farm = Farm::open_in_memory(config).unwrap();
    let id = farm.add_paddock("Still", 3.0, 400.0).unwrap();
    add_mob(&farm, 1, Some(id), 9);

    farm.advance_day().unwrap();
    assert_eq!(farm.get_paddock(id).unwrap().unwrap().dm_per_ha, 400.0);
    assert_eq!(farm.simulation().unwrap().model().growth_rate(), 0.0);
}

#[test]
fn failed_write_rolls_back_whole_day() {
    let farm = farm();
    let first = farm.add_paddock("First", 1.0, 100.0).unwrap();
    let second = farm.add_paddock("Second", 1.0, 100.0).unwrap();
    farm.current_date().unwrap();
    farm.connection()
        .execute_batch(&format!(
            "CREATE TRIGGER reject_second BEFORE UPDATE OF dm_per_ha ON paddocks
             WHEN NEW.id = {second}
             BEGIN SELECT RAISE(ABORT, 'paddock locked'); END;"
        ))
        .unwrap();

    let err = farm.advance_day().unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    assert_eq!(farm.get_paddock(first).unwrap().unwrap().dm_per_ha, 100.0);
    assert_eq!(farm.current_date().unwrap(), date(2024, 11, 15));
}

#[test]
fn advance_with_no_paddocks_only_moves_date() {
    let farm = farm();
    let report = farm.advance_day().unwrap();
    assert!(report.updates.is_empty());
    assert_eq!(report.date, date(2024, 11, 16));
}
