// Dev utility: reset the database and seed a deterministic demo scenario.
//
// Usage:
//   cargo run --bin seed_demo_db -- [db_path] [order_count]
//
// Existing database files are backed up next to the original before reset.

use chrono::Local;
use std::error::Error;
use std::fs;
use std::path::Path;

use courier_dispatch::api::ImportRequest;
use courier_dispatch::app::{get_default_db_path, AppState};
use courier_dispatch::domain::{CourierType, NewCourier, NewOrder};

const DEFAULT_ORDER_COUNT: usize = 40;
const REGION_COUNT: i64 = 6;

fn main() -> Result<(), Box<dyn Error>> {
    courier_dispatch::logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    let order_count = std::env::args()
        .nth(2)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_ORDER_COUNT)
        .max(1);

    backup_and_reset_db(&db_path)?;

    let state = AppState::new(db_path.clone())?;

    let seeded = state.import_api.import(ImportRequest {
        couriers: demo_couriers(),
        orders: demo_orders(order_count),
    })?;

    eprintln!(
        "Seeded {} couriers and {} orders into {}",
        seeded.courier_ids.len(),
        seeded.order_ids.len(),
        db_path
    );
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn demo_couriers() -> Vec<NewCourier> {
    let shifts = [
        vec!["08:00-12:00".to_string(), "13:00-17:00".to_string()],
        vec!["10:00-20:00".to_string()],
        vec!["07:00-15:00".to_string()],
    ];

    CourierType::PRIORITY_ORDER
        .iter()
        .flat_map(|courier_type| {
            (0..3i64).map(move |i| (*courier_type, i))
        })
        .map(|(courier_type, i)| {
            let first_region = i % REGION_COUNT + 1;
            let regions = (first_region..first_region + 3)
                .map(|r| (r - 1) % REGION_COUNT + 1)
                .collect();
            NewCourier {
                courier_type,
                regions,
                working_hours: shifts[i as usize % shifts.len()].clone(),
            }
        })
        .collect()
}

fn demo_orders(count: usize) -> Vec<NewOrder> {
    (0..count)
        .map(|i| {
            let start_hour = 8 + (i % 10);
            NewOrder {
                weight: 0.5 + (i % 9) as f64 * 1.5,
                region: (i as i64 % REGION_COUNT) + 1,
                delivery_hours: vec![format!("{:02}:00-{:02}:00", start_hour, start_hour + 2)],
                cost: 100.0 + (i % 5) as f64 * 50.0,
            }
        })
        .collect()
}
