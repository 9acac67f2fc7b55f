use serde::Deserialize;
use tracing::debug;

use crate::error::IngestError;
use crate::geo::Coordinate;

/// Top level of the metro-map document.
#[derive(Deserialize, Debug)]
pub struct NetworkDocument {
    /// Network display name.
    #[serde(rename = "s", default)]
    pub name: String,
    #[serde(rename = "i", default)]
    pub id: String,
    #[serde(rename = "l")]
    pub lines: Vec<LineDocument>,
}

#[derive(Deserialize, Debug)]
pub struct LineDocument {
    #[serde(rename = "ln")]
    pub id: String,
    #[serde(rename = "kn", default)]
    pub display_name: Option<String>,
    #[serde(rename = "st")]
    pub stations: Vec<StationDocument>,
}

#[derive(Deserialize, Debug)]
pub struct StationDocument {
    #[serde(rename = "n")]
    pub name: String,
    /// "lon,lat"
    #[serde(rename = "sl", default)]
    pub location: Option<String>,
    #[serde(rename = "sid", default)]
    pub source_id: Option<String>,
    #[serde(rename = "sp", default)]
    pub romanized: Option<String>,
}

/// One station occurrence on one line.
#[derive(Clone, Debug, PartialEq)]
pub struct StationRecord {
    pub line: String,
    pub name: String,
    pub coordinate: Coordinate,
}

/// Parse a "lon,lat" field. Longitude comes first.
fn parse_location(line: &str, station: &str, value: &str) -> Result<Coordinate, IngestError> {
    let malformed = || IngestError::MalformedCoordinate {
        line: line.to_owned(),
        station: station.to_owned(),
        value: value.to_owned(),
    };
    let mut parts = value.split(',');
    let (lon, lat) = match (parts.next(), parts.next(), parts.next()) {
        (Some(lon), Some(lat), None) => (lon.trim(), lat.trim()),
        _ => return Err(malformed()),
    };
    let lon: f64 = lon.parse().map_err(|_| malformed())?;
    let lat: f64 = lat.parse().map_err(|_| malformed())?;
    // f64 parsing accepts "NaN" and "inf"
    if !lon.is_finite() || !lat.is_finite() {
        return Err(malformed());
    }
    Ok(Coordinate::new(lat, lon))
}

impl NetworkDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IngestError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Flatten lines into records, preserving line order and station order within each line.
    pub fn records(&self) -> Result<Vec<StationRecord>, IngestError> {
        let total = self.lines.iter().map(|l| l.stations.len()).sum();
        let mut records = Vec::with_capacity(total);
        for line in &self.lines {
            for station in &line.stations {
                let location = station.location.as_deref().ok_or_else(|| {
                    IngestError::MissingCoordinate {
                        line: line.id.clone(),
                        station: station.name.clone(),
                    }
                })?;
                records.push(StationRecord {
                    line: line.id.clone(),
                    name: station.name.clone(),
                    coordinate: parse_location(&line.id, &station.name, location)?,
                });
            }
        }
        debug!(
            network = %self.name,
            lines = self.lines.len(),
            records = records.len(),
            "ingested network"
        );
        Ok(records)
    }
}

/// Parse a document and flatten it in one step.
pub fn ingest(bytes: &[u8]) -> Result<(NetworkDocument, Vec<StationRecord>), IngestError> {
    let document = NetworkDocument::from_slice(bytes)?;
    let records = document.records()?;
    Ok((document, records))
}
