//! GeoJSON-like geometries used for trigger areas and alert coordinates.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// `[lon, lat]`, in GeoJSON order.
pub type Position = [f64; 2];

/// A validated geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    lon: f64,
    lat: f64,
}

impl Point {
    pub fn new(lon: f64, lat: f64) -> Result<Self> {
        check_position([lon, lat])?;
        Ok(Self { lon, lat })
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn position(&self) -> Position {
        [self.lon, self.lat]
    }
}

/// Area descriptor, serialized as `{"type": ..., "coordinates": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    pub fn point(lon: f64, lat: f64) -> Result<Self> {
        let g = Geometry::Point([lon, lat]);
        g.validate()?;
        Ok(g)
    }

    pub fn multi_point(positions: Vec<Position>) -> Result<Self> {
        let g = Geometry::MultiPoint(positions);
        g.validate()?;
        Ok(g)
    }

    pub fn polygon(rings: Vec<Vec<Position>>) -> Result<Self> {
        let g = Geometry::Polygon(rings);
        g.validate()?;
        Ok(g)
    }

    pub fn multi_polygon(polygons: Vec<Vec<Vec<Position>>>) -> Result<Self> {
        let g = Geometry::MultiPolygon(polygons);
        g.validate()?;
        Ok(g)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Check coordinate ranges and ring shape.
    ///
    /// Variants can be built directly, so geometries coming from outside
    /// (e.g. a deserialized document) should pass through here.
    pub fn validate(&self) -> Result<()> {
        match self {
            Geometry::Point(p) => check_position(*p),
            Geometry::MultiPoint(points) => {
                if points.is_empty() {
                    return Err(Error::invalid("a MultiPoint needs at least one position"));
                }
                points.iter().try_for_each(|p| check_position(*p))
            }
            Geometry::Polygon(rings) => check_polygon(rings),
            Geometry::MultiPolygon(polygons) => {
                if polygons.is_empty() {
                    return Err(Error::invalid("a MultiPolygon needs at least one polygon"));
                }
                polygons.iter().try_for_each(|rings| check_polygon(rings))
            }
        }
    }
}

fn check_position([lon, lat]: Position) -> Result<()> {
    if !(-180.0..=180.0).contains(&lon) {
        return Err(Error::invalid(format!("longitude {lon} is outside [-180, 180]")));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(Error::invalid(format!("latitude {lat} is outside [-90, 90]")));
    }
    Ok(())
}

fn check_polygon(rings: &[Vec<Position>]) -> Result<()> {
    if rings.is_empty() {
        return Err(Error::invalid("a Polygon needs at least one linear ring"));
    }

    for ring in rings {
        // Linear rings are closed: first and last positions coincide.
        if ring.len() < 4 {
            return Err(Error::invalid(format!(
                "a linear ring needs at least 4 positions, got {}",
                ring.len()
            )));
        }
        if ring.first() != ring.last() {
            return Err(Error::invalid("a linear ring must start and end on the same position"));
        }
        ring.iter().try_for_each(|p| check_position(*p))?;
    }

    Ok(())
}
