//! Train schedule lookup: station catalog and query building.
//!
//! The schedule itself comes from the train tool; this module only tracks
//! the user's selection and turns it into a command line.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::process::Invocation;

const STATIONS: &[(&str, &str)] = &[
    ("NYK", "Penn Station"),
    ("CPG", "Copiague"),
    ("FMD", "Farmingdale"),
    ("BTA", "Babylon"),
    ("RVC", "Rockville Centre"),
    ("ABT", "Albertson"),
    ("ADL", "Auburndale"),
    ("AGT", "Amagansett"),
    ("ATL", "Flatbush Avenue"),
    ("AVL", "Amityville"),
    ("BDY", "Broadway"),
    ("BHN", "Bridgehampton"),
    ("BK", "Stony Brook"),
    ("BMR", "Bellmore"),
    ("BPG", "Bethpage"),
    ("BPT", "Bellport"),
    ("BRS", "Bellerose"),
    ("BRT", "Belmont Race Track"),
    ("BSD", "Bayside"),
    ("BSR", "Bay Shore"),
    ("BWD", "Brentwood"),
    ("BWN", "Baldwin"),
    ("CAV", "Centre Avenue"),
    ("CHT", "Cedarhurst"),
    ("CI", "Central Islip"),
    ("CLP", "Country Life Press"),
    ("CPL", "Carle Place"),
    ("CSH", "Cold Spring Harbor"),
    ("DGL", "Douglaston"),
    ("DPK", "Deer Park"),
    ("EHN", "East Hampton"),
    ("ENY", "East New York"),
    ("ERY", "East Rockaway"),
    ("EWN", "East Williston"),
    ("FHL", "Forest Hills"),
    ("FLS", "Flushing"),
    ("FPK", "Floral Park"),
    ("FPT", "Freeport"),
    ("FRY", "Far Rockaway"),
    ("GBN", "Gibson"),
    ("GCV", "Glen Cove"),
    ("GCY", "Garden City"),
    ("GHD", "Glen Head"),
    ("GNK", "Great Neck"),
    ("GPT", "Greenport"),
    ("GRV", "Great River"),
    ("GST", "Glen Street"),
    ("GVL", "Greenvale"),
    ("GWN", "Greenlawn"),
    ("HBY", "Hampton Bays"),
    ("HEM", "Hempstead"),
    ("HGN", "Hempstead Gardens"),
    ("HOL", "Hollis"),
    ("HPA", "Hunterspoint Ave."),
    ("HUN", "Huntington"),
    ("HVL", "Hicksville"),
    ("HWT", "Hewlett"),
    ("IPK", "Island Park"),
    ("ISP", "Islip"),
    ("IWD", "Inwood"),
    ("JAM", "Jamaica"),
    ("KGN", "Kew Gardens"),
    ("KPK", "Kings Park"),
    ("LBH", "Long Beach"),
    ("LCE", "Lawrence"),
    ("LHT", "Lindenhurst"),
    ("LIC", "Long Island City"),
    ("LMR", "Locust Manor"),
    ("LNK", "Little Neck"),
    ("LTN", "Laurelton"),
    ("LVL", "Locust Valley"),
    ("LVW", "Lakeview"),
    ("LYN", "Lynbrook"),
    ("MAK", "Mattituck"),
    ("MAV", "Merillon Avenue"),
    ("MFD", "Medford"),
    ("MHL", "Murray Hill"),
    ("MHT", "Manhasset"),
    ("MIN", "Mineola"),
    ("MPK", "Massapequa Park"),
    ("MQA", "Massapequa"),
    ("MRK", "Merrick"),
    ("MSY", "Mastic Shirley"),
    ("MTK", "Montauk"),
    ("MVN", "Malverne"),
    ("NAV", "Nostrand Ave."),
    ("NBD", "Nassau Blvd"),
    ("NHP", "New Hyde Park"),
    ("NPT", "Northport"),
    ("OBY", "Oyster Bay"),
    ("ODE", "Oceanside"),
    ("ODL", "Oakdale"),
    ("PD", "Patchogue"),
    ("PDM", "Plandome"),
    ("PJN", "Port Jefferson"),
    ("PLN", "Pinelawn"),
    ("PWS", "Port Washington"),
    ("QVG", "Queens Village"),
    ("RHD", "Riverhead"),
    ("RON", "Ronkonkoma"),
    ("ROS", "Rosedale"),
    ("RSN", "Roslyn"),
    ("SAB", "St. Albans"),
    ("SCF", "Sea Cliff"),
    ("SFD", "Seaford"),
    ("SHD", "Southold"),
    ("SHN", "Southampton"),
    ("SJM", "St. James"),
    ("SMR", "Stewart Manor"),
    ("SPK", "Speonk"),
    ("SSM", "Mets-Willets Point"),
    ("STN", "Smithtown"),
    ("SVL", "Sayville"),
    ("SYT", "Syosset"),
    ("VSM", "Valley Stream"),
    ("WBY", "Westbury"),
    ("WDD", "Woodside"),
    ("WGH", "Wantagh"),
    ("WHD", "West Hempstead"),
    ("WHN", "Westhampton"),
    ("WMR", "Woodmere"),
    ("WWD", "Westwood"),
    ("WYD", "Wyandanch"),
    ("YPK", "Yaphank"),
];

/// A station the train tool knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    /// Short station code, e.g. `NYK`.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.name)
    }
}

/// Ordered list of selectable stations.
#[derive(Debug, Clone)]
pub struct StationCatalog {
    stations: Vec<Station>,
}

impl Default for StationCatalog {
    fn default() -> Self {
        Self {
            stations: STATIONS
                .iter()
                .map(|&(id, name)| Station {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        }
    }
}

impl StationCatalog {
    /// All stations, in display order.
    #[must_use]
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Looks a station up by code, ignoring case.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id.eq_ignore_ascii_case(id))
    }
}

/// Which end of the trip a station is selected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationField {
    /// Departure station.
    From,
    /// Arrival station.
    To,
}

impl FromStr for StationField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "from" => Ok(Self::From),
            "to" => Ok(Self::To),
            other => Err(format!("invalid station field: {other}")),
        }
    }
}

/// The user's current trip selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainQuery {
    from: Option<String>,
    to: Option<String>,
    date: Option<String>,
    time: Option<String>,
}

/// Treats the literal `none` as clearing the value.
fn unless_none(value: &str) -> Option<String> {
    (value != "none").then(|| value.to_string())
}

impl TrainQuery {
    /// Sets the departure or arrival station.
    pub fn select_station(&mut self, field: StationField, station_id: &str) {
        let slot = match field {
            StationField::From => &mut self.from,
            StationField::To => &mut self.to,
        };
        *slot = Some(station_id.to_string());
    }

    /// Sets the travel date; `none` clears it.
    pub fn select_date(&mut self, date: &str) {
        self.date = unless_none(date);
    }

    /// Sets the travel time; `none` clears it.
    pub fn select_time(&mut self, time: &str) {
        self.time = unless_none(time);
    }

    /// Builds `PREFIX -b FROM TO [DATE TIME]`.
    ///
    /// A time without a date searches the next matching day.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSelection`] if either station is unset, or a
    /// date is set without a time.
    pub fn invocation<I, S>(&self, prefix: I) -> Result<Invocation>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (Some(from), Some(to)) = (&self.from, &self.to) else {
            return Err(Error::MissingSelection(
                "select both a FROM and a TO station".into(),
            ));
        };
        let invocation = Invocation::new(prefix).args(["-b", from.as_str(), to.as_str()]);
        match (&self.date, &self.time) {
            (None, None) => Ok(invocation),
            (None, Some(time)) => Ok(invocation.args(["next", time.as_str()])),
            (Some(date), Some(time)) => Ok(invocation.args([date.as_str(), time.as_str()])),
            (Some(_), None) => Err(Error::MissingSelection("a date needs a time".into())),
        }
    }

    /// Two-line summary of the selection.
    #[must_use]
    pub fn label_text(&self) -> String {
        let show = |value: Option<&str>| value.unwrap_or("None").to_string();
        format!(
            "  From: {}  To: {}\n  Date: {}  Time: {}",
            show(self.from.as_deref()),
            show(self.to.as_deref()),
            show(self.date.as_deref()),
            show(self.time.as_deref())
        )
    }
}
