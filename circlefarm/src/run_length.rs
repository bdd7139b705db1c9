use serde::{Deserialize, Serialize};

use crate::pixel_set::PixelSet;

/// One maximal horizontal run of mask pixels at row `y`, inclusive on both
/// ends. This struct is also the wire record of the annotation schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stripe {
    pub y: i32,
    pub x_start: i32,
    pub x_end: i32,
}

/// Run-length form of a pixel set: an ordered stripe list. Expanding the
/// stripes reproduces the source set exactly, whatever their order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunLengthMask {
    stripes: Vec<Stripe>,
}

impl RunLengthMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stripe: Stripe) {
        self.stripes.push(stripe);
    }

    pub fn len(&self) -> usize {
        self.stripes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stripes.is_empty()
    }

    pub fn stripes(&self) -> &[Stripe] {
        &self.stripes
    }

    /// Decode back into the sparse set form.
    pub fn expand(&self) -> PixelSet {
        let mut set = PixelSet::new();
        for stripe in &self.stripes {
            for x in stripe.x_start..=stripe.x_end {
                set.add(x, stripe.y);
            }
        }
        set
    }
}

impl From<Vec<Stripe>> for RunLengthMask {
    fn from(stripes: Vec<Stripe>) -> Self {
        Self { stripes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_is_order_independent() {
        let forward: RunLengthMask = vec![
            Stripe {
                y: 0,
                x_start: 0,
                x_end: 2,
            },
            Stripe {
                y: 1,
                x_start: 1,
                x_end: 1,
            },
        ]
        .into();
        let backward: RunLengthMask = vec![
            Stripe {
                y: 1,
                x_start: 1,
                x_end: 1,
            },
            Stripe {
                y: 0,
                x_start: 0,
                x_end: 2,
            },
        ]
        .into();
        assert_eq!(forward.expand(), backward.expand());
        assert_eq!(forward.expand().len(), 4);
    }

    #[test]
    fn stripe_serializes_with_schema_field_names() {
        let stripe = Stripe {
            y: 1,
            x_start: 2,
            x_end: 4,
        };
        let json = serde_json::to_string(&stripe).unwrap();
        assert_eq!(json, r#"{"y":1,"x_start":2,"x_end":4}"#);
    }

    #[test]
    fn mask_serializes_as_bare_stripe_list() {
        let mask: RunLengthMask = vec![Stripe {
            y: 3,
            x_start: 0,
            x_end: 0,
        }]
        .into();
        let json = serde_json::to_string(&mask).unwrap();
        assert_eq!(json, r#"[{"y":3,"x_start":0,"x_end":0}]"#);
        let back: RunLengthMask = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mask);
    }

    #[test]
    fn stripe_decode_rejects_unknown_fields() {
        let err = serde_json::from_str::<Stripe>(r#"{"y":1,"x_start":2,"x_end":4,"w":9}"#);
        assert!(err.is_err());
    }

    #[test]
    fn stripe_decode_rejects_missing_fields() {
        let err = serde_json::from_str::<Stripe>(r#"{"y":1,"x_start":2}"#);
        assert!(err.is_err());
    }
}
