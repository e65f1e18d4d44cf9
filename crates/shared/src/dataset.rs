use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::geometry::Rect;

/// One drawable boundary shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    pub name: String,
    /// SVG path data. Never modified after loading.
    #[serde(rename = "d")]
    pub geometry: String,
    #[serde(default, rename = "transform", skip_serializing_if = "Option::is_none")]
    pub auxiliary_transform: Option<String>,
    #[serde(default, rename = "className", skip_serializing_if = "Option::is_none")]
    pub style_class: Option<String>,
}

impl Region {
    pub fn new(id: impl Into<String>, name: impl Into<String>, geometry: impl Into<String>) -> Self {
        Region {
            id: id.into(),
            name: name.into(),
            geometry: geometry.into(),
            auxiliary_transform: None,
            style_class: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.style_class = Some(class.into());
        self
    }

    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.auxiliary_transform = Some(transform.into());
        self
    }
}

/// All regions of one map plus its intrinsic bounds, if the source has them.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub regions: Vec<Region>,
    pub intrinsic_bounds: Option<Rect>,
}

/// On-disk / embedded form of a dataset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetDocument {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    view_box: Option<String>,
    paths: Vec<Region>,
}

impl Dataset {
    pub fn new(id: impl Into<String>, name: impl Into<String>, regions: Vec<Region>) -> Self {
        Dataset {
            id: id.into(),
            name: name.into(),
            regions,
            intrinsic_bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.intrinsic_bounds = Some(bounds);
        self
    }

    /// Decode a JSON dataset document:
    /// `{ id, name, viewBox?, paths: [{ id, name, d, transform?, className? }] }`.
    ///
    /// `label` names the dataset in error messages.
    pub fn from_json(label: &str, json: &str) -> Result<Self, MapError> {
        let doc: DatasetDocument =
            serde_json::from_str(json).map_err(|e| MapError::InvalidDataset {
                name: label.to_string(),
                reason: e.to_string(),
            })?;

        let intrinsic_bounds = match doc.view_box.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(vb) => Some(Rect::parse_view_box(vb).map_err(|e| MapError::InvalidDataset {
                name: label.to_string(),
                reason: e.to_string(),
            })?),
        };

        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = doc.paths.iter().find(|r| !seen.insert(r.id.as_str())) {
            return Err(MapError::InvalidDataset {
                name: label.to_string(),
                reason: format!("duplicate region id \"{}\"", dup.id),
            });
        }

        Ok(Dataset {
            id: doc.id,
            name: if doc.name.is_empty() {
                label.to_string()
            } else {
                doc.name
            },
            regions: doc.paths,
            intrinsic_bounds,
        })
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }
}
