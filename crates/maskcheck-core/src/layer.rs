use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A mask layer of the sketch.
///
/// The set is closed: layers are part of the technology, not created at runtime.
/// Declaration order is the canonical order used wherever layers are walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Metal1,
    Metal2,
    Poly,
    Diffusion,
    Well,
    Contact,
}

impl Layer {
    /// Every layer, in canonical order.
    pub const ALL: [Layer; 6] = [
        Layer::Metal1,
        Layer::Metal2,
        Layer::Poly,
        Layer::Diffusion,
        Layer::Well,
        Layer::Contact,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Layer::Metal1 => "metal1",
            Layer::Metal2 => "metal2",
            Layer::Poly => "poly",
            Layer::Diffusion => "diffusion",
            Layer::Well => "well",
            Layer::Contact => "contact",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown layer '{0}'")]
pub struct UnknownLayer(pub String);

impl FromStr for Layer {
    type Err = UnknownLayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::ALL
            .iter()
            .copied()
            .find(|l| l.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLayer(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_names_roundtrip() {
        for layer in Layer::ALL {
            assert_eq!(layer.name().parse::<Layer>().unwrap(), layer);
        }
        assert_eq!(" Metal2 ".parse::<Layer>().unwrap(), Layer::Metal2);
    }

    #[test]
    fn test_unknown_layer() {
        let err = "metal3".parse::<Layer>().unwrap_err();
        assert_eq!(err, UnknownLayer("metal3".to_string()));
    }

    #[test]
    fn test_layer_serde_lowercase() {
        let json = serde_json::to_string(&Layer::Diffusion).unwrap();
        assert_eq!(json, "\"diffusion\"");
        let layer: Layer = serde_json::from_str("\"contact\"").unwrap();
        assert_eq!(layer, Layer::Contact);
    }

    #[test]
    fn test_canonical_order() {
        let mut shuffled = vec![Layer::Contact, Layer::Poly, Layer::Metal2, Layer::Metal1];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Layer::Metal1, Layer::Metal2, Layer::Poly, Layer::Contact]
        );
    }
}
