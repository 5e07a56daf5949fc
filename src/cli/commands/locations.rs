use crate::cli::commands::open_store;
use crate::config::Config;
use crate::db::store::RecordStore;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::table::{Column, Table};

pub fn handle(cfg: &Config) -> AppResult<()> {
    let owner = cfg.require_owner()?;
    let mut pool = open_store(cfg)?;
    let locations = pool.list_locations(owner)?;

    header("Locations");

    if locations.is_empty() {
        info("No locations registered.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::new("Name", 25),
        Column::new("Address", 30),
        Column::new("Latitude", 10),
        Column::new("Longitude", 10),
        Column::new("Radius", 8),
        Column::new("Status", 8),
    ]);

    for l in &locations {
        table.add_row(vec![
            l.name.clone(),
            l.address.clone(),
            format!("{:.5}", l.latitude),
            format!("{:.5}", l.longitude),
            format!("{:.0} m", l.radius_m),
            l.status_label().to_string(),
        ]);
    }

    print!("{}", table.render());
    Ok(())
}
