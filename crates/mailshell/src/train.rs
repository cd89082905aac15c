//! Controller for the train schedule shell.

use mailshell_core::process::launch;
use mailshell_core::train::StationField;
use mailshell_core::{Invocation, Result, Settings, Station, StationCatalog, TrainQuery};
use tracing::{info, warn};

use crate::model::{ListModel, ModelChange};

/// Station list and trip selection for the train tool.
#[derive(Debug)]
pub struct TrainController {
    catalog: StationCatalog,
    stations: ListModel<Station>,
    query: TrainQuery,
    command: Vec<String>,
}

impl TrainController {
    /// Creates a controller with the station list loaded and no pending
    /// changes.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        let mut controller = Self {
            catalog: StationCatalog::default(),
            stations: ListModel::new(),
            query: TrainQuery::default(),
            command: settings.train_command.clone(),
        };
        controller.setup_stations();
        controller.stations.take_changes();
        controller
    }

    /// Reloads the station list model from the catalog.
    pub fn setup_stations(&mut self) {
        self.stations.set_items(self.catalog.stations().to_vec());
    }

    /// Station list model.
    #[must_use]
    pub const fn stations(&self) -> &ListModel<Station> {
        &self.stations
    }

    /// Drains station list changes.
    pub fn take_station_changes(&mut self) -> Vec<ModelChange> {
        self.stations.take_changes()
    }

    /// Selects a station for one end of the trip.
    ///
    /// Known codes are matched case-insensitively; unknown codes are passed
    /// to the train tool as given.
    pub fn select_station(&mut self, field: StationField, station_id: &str) {
        let id = match self.catalog.get(station_id) {
            Some(station) => station.id.clone(),
            None => {
                warn!("Unknown station code {station_id}");
                station_id.to_string()
            }
        };
        self.query.select_station(field, &id);
    }

    /// Sets the date; `none` clears it.
    pub fn select_date(&mut self, date: &str) {
        self.query.select_date(date);
    }

    /// Sets the time; `none` clears it.
    pub fn select_time(&mut self, time: &str) {
        self.query.select_time(time);
    }

    /// Launches the train tool for the current selection without waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection is incomplete or the tool cannot be
    /// started.
    pub fn search(&self) -> Result<Invocation> {
        let invocation = self.query.invocation(self.command.iter().cloned())?;
        info!("Searching: {invocation}");
        launch(&invocation)?;
        Ok(invocation)
    }

    /// Two-line summary of the selection.
    #[must_use]
    pub fn label_text(&self) -> String {
        self.query.label_text()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn controller(command: &[&str]) -> TrainController {
        TrainController::new(&Settings {
            train_command: command.iter().map(ToString::to_string).collect(),
            ..Settings::default()
        })
    }

    #[test]
    fn test_stations_loaded() {
        let mut c = controller(&["lirr_train_time"]);
        assert_eq!(c.stations().items()[0].id, "NYK");
        assert!(c.take_station_changes().is_empty());
        c.setup_stations();
        assert_eq!(c.take_station_changes(), vec![ModelChange::Reset]);
    }

    #[test]
    fn test_station_codes_are_normalized() {
        let mut c = controller(&["lirr_train_time"]);
        c.select_station(StationField::From, "nyk");
        c.select_station(StationField::To, "ZZZ");
        assert_eq!(
            c.label_text(),
            "  From: NYK  To: ZZZ\n  Date: None  Time: None"
        );
    }

    #[tokio::test]
    async fn test_search_launches_tool() {
        let mut c = controller(&["true"]);
        c.select_station(StationField::From, "NYK");
        c.select_station(StationField::To, "BTA");
        c.select_time("6:15pm");
        let invocation = c.search().unwrap();
        assert_eq!(invocation.argv(), ["true", "-b", "NYK", "BTA", "next", "6:15pm"]);
    }

    #[tokio::test]
    async fn test_search_needs_both_stations() {
        let c = controller(&["true"]);
        assert!(c.search().is_err());
    }
}
