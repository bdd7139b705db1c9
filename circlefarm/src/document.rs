use serde::{Deserialize, Serialize};

use crate::error::FarmResult;
use crate::label::Label;
use crate::run_length::{RunLengthMask, Stripe};

/// Ground-truth annotation for one rendered image: logical name, the image
/// dimensions, and the ordered labels with their pixel masks.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationDocument {
    name: String,
    width: u32,
    height: u32,
    labels: Vec<Label>,
}

/// Wire records. The decoder is strict: unknown or missing fields fail the
/// whole document.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LabelRecord {
    name: String,
    mask: Vec<Stripe>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocumentRecord {
    name: String,
    width: u32,
    height: u32,
    labels: Vec<LabelRecord>,
}

impl AnnotationDocument {
    pub fn new(name: impl Into<String>, width: u32, height: u32, labels: Vec<Label>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            labels,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Pretty-printed JSON in the annotation schema, masks run-length
    /// encoded row-ascending then x-ascending.
    pub fn to_json(&self) -> FarmResult<String> {
        let record = DocumentRecord {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            labels: self
                .labels
                .iter()
                .map(|label| LabelRecord {
                    name: label.name().to_owned(),
                    mask: label.pixels().to_run_length().stripes().to_vec(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&record)?)
    }

    pub fn from_json(text: &str) -> FarmResult<Self> {
        let record: DocumentRecord = serde_json::from_str(text)?;
        Ok(Self {
            name: record.name,
            width: record.width,
            height: record.height,
            labels: record
                .labels
                .into_iter()
                .map(|label| {
                    let mask = RunLengthMask::from(label.mask);
                    Label::with_pixels(label.name, mask.expand())
                })
                .collect(),
        })
    }
}
