//! The static format registry.
//!
//! The carvable set is closed and known at build time, so the registry is an
//! immutable table constructed once and borrowed by the scanner and the
//! orchestrator. No runtime registration, no reflection.

use crate::carve::estimators::{
    self, BinkEstimator, BoundaryEstimator, BytecodeEstimator, DdsEstimator, NifEstimator,
    PngEstimator, ScriptEstimator, TiledTextureEstimator, WaveEstimator,
};
use crate::core::FormatId;
use crate::scan::SignatureScanner;
use once_cell::sync::Lazy;

/// One registered format: its magic variants and its estimator.
pub struct FormatSpec {
    pub id: FormatId,
    pub magics: Vec<&'static [u8]>,
    pub estimator: &'static (dyn BoundaryEstimator),
}

/// The closed registry, in candidate-dispatch order.
pub struct FormatRegistry {
    specs: Vec<FormatSpec>,
}

impl FormatRegistry {
    pub fn specs(&self) -> &[FormatSpec] {
        &self.specs
    }

    pub fn spec(&self, id: FormatId) -> &FormatSpec {
        self.specs
            .iter()
            .find(|s| s.id == id)
            .expect("registry covers every FormatId")
    }

    /// All `(magic, format)` pairs, for scanner construction.
    pub fn patterns(&self) -> impl Iterator<Item = (&'static [u8], FormatId)> + '_ {
        self.specs
            .iter()
            .flat_map(|s| s.magics.iter().map(move |m| (*m, s.id)))
    }

    /// Build the one-pass scanner over every registered magic.
    pub fn scanner(&self) -> SignatureScanner {
        SignatureScanner::new(self.patterns())
    }
}

/// The process-wide registry instance.
pub static REGISTRY: Lazy<FormatRegistry> = Lazy::new(|| FormatRegistry {
    specs: vec![
        FormatSpec {
            id: FormatId::Dds,
            magics: vec![b"DDS "],
            estimator: &DdsEstimator,
        },
        FormatSpec {
            id: FormatId::TiledTexture,
            magics: estimators::tiled::MAGICS.to_vec(),
            estimator: &TiledTextureEstimator,
        },
        FormatSpec {
            id: FormatId::Wave,
            magics: vec![b"RIFF"],
            estimator: &WaveEstimator,
        },
        FormatSpec {
            id: FormatId::Nif,
            magics: vec![estimators::nif::MAGIC],
            estimator: &NifEstimator,
        },
        FormatSpec {
            id: FormatId::ScriptSource,
            magics: estimators::script::MAGIC_VARIANTS.to_vec(),
            estimator: &ScriptEstimator,
        },
        FormatSpec {
            id: FormatId::ScriptBytecode,
            magics: vec![estimators::bytecode::MAGIC],
            estimator: &BytecodeEstimator,
        },
        FormatSpec {
            id: FormatId::Png,
            magics: vec![estimators::png::MAGIC],
            estimator: &PngEstimator,
        },
        FormatSpec {
            id: FormatId::Bink,
            magics: estimators::bink::MAGICS.to_vec(),
            estimator: &BinkEstimator,
        },
    ],
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_format() {
        for id in FormatId::ALL {
            assert_eq!(REGISTRY.spec(id).id, id);
        }
        assert_eq!(REGISTRY.specs().len(), FormatId::ALL.len());
    }

    #[test]
    fn patterns_are_nonempty_and_unique() {
        let pats: Vec<_> = REGISTRY.patterns().collect();
        assert!(pats.len() >= FormatId::ALL.len());
        let mut magics: Vec<&[u8]> = pats.iter().map(|(m, _)| *m).collect();
        magics.sort_unstable();
        let before = magics.len();
        magics.dedup();
        assert_eq!(before, magics.len());
    }
}
