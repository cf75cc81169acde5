//! Plain-text rendering of farm listings.

use chrono::NaiveDate;
use paddock_core::{DayReport, MobOverview, MoveOptions, PaddockOverview, Stock};

pub fn paddocks(items: &[PaddockOverview]) -> String {
    let header = format!(
        "{:>4}  {:<16} {:>8} {:>10} {:>12}  {:<12} {:>5}",
        "id", "name", "area_ha", "dm_per_ha", "total_dm", "mob", "stock"
    );
    table(
        header,
        items.iter().map(|item| {
            format!(
                "{:>4}  {:<16} {:>8.2} {:>10.2} {:>12.2}  {:<12} {:>5}",
                item.id,
                item.name,
                item.area,
                item.dm_per_ha,
                item.total_dm,
                item.mob_name.as_deref().unwrap_or("-"),
                item.stock_count
            )
        }),
    )
}

pub fn mobs(items: &[MobOverview]) -> String {
    let header = format!("{:>4}  {:<16} {:<16} {:>5}", "id", "name", "paddock", "stock");
    table(
        header,
        items.iter().map(|item| {
            format!(
                "{:>4}  {:<16} {:<16} {:>5}",
                item.id,
                item.name,
                item.paddock_name.as_deref().unwrap_or("-"),
                item.stock_count
            )
        }),
    )
}

/// Stock rows with age as of the simulated date.
pub fn stock(items: &[Stock], on: NaiveDate) -> String {
    let header = format!("{:>6}  {:<10} {:>8} {:>9}", "id", "dob", "age_days", "weight_kg");
    table(
        header,
        items.iter().map(|item| {
            let dob = item.dob.map_or_else(|| "-".to_string(), |dob| dob.to_string());
            let age = item
                .age_days(on)
                .map_or_else(|| "-".to_string(), |days| days.to_string());
            let weight = item
                .weight
                .map_or_else(|| "-".to_string(), |kg| format!("{kg:.1}"));
            format!("{:>6}  {:<10} {:>8} {:>9}", item.id, dob, age, weight)
        }),
    )
}

pub fn move_options(options: &MoveOptions) -> String {
    let mobs = options
        .mobs
        .iter()
        .map(|mob| format!("  {:>4}  {}", mob.id, mob.name));
    let vacant = options
        .vacant_paddocks
        .iter()
        .map(|paddock| format!("  {:>4}  {}", paddock.id, paddock.name));
    format!(
        "{}{}",
        table("mobs on a paddock:".to_string(), mobs),
        table("vacant paddocks:".to_string(), vacant)
    )
}

pub fn day_report(report: &DayReport) -> String {
    let header = format!("{} -> {}", report.previous_date, report.date);
    table(
        header,
        report.updates.iter().map(|update| {
            format!(
                "  paddock {:>4}: +{:.1} -{:.1} ({} head) => {:.2} kg DM/ha, {:.2} kg DM",
                update.paddock_id,
                update.growth,
                update.consumption,
                update.stock_count,
                update.dm_per_ha,
                update.total_dm
            )
        }),
    )
}

/// Joins `header` and `rows`, one line each, with a trailing newline.
fn table(header: String, rows: impl Iterator<Item = String>) -> String {
    let mut lines = vec![header];
    lines.extend(rows);
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
