//! Crop input estimates per planted area.

use serde::Serialize;
use thiserror::Error;

/// Reference quantities per square meter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsumosPorM2 {
    pub mudas: f64,
    pub calcario_kg: f64,
    pub fertilizante_kg: f64,
    pub palhada_kg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimativa {
    pub mudas: f64,
    pub calcario_kg: f64,
    pub fertilizante_kg: f64,
    pub palhada_kg: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum AgronomyError {
    #[error("unknown crop '{0}' (known: cafe, soja)")]
    UnknownCrop(String),
}

pub fn reference(cultura: &str) -> Option<InsumosPorM2> {
    match cultura.trim().to_lowercase().as_str() {
        // One seedling every 2.8 m².
        "cafe" | "café" => Some(InsumosPorM2 {
            mudas: 1.0 / 2.8,
            calcario_kg: 0.3,
            fertilizante_kg: 0.15,
            palhada_kg: 5.0,
        }),
        "soja" => Some(InsumosPorM2 {
            mudas: 30.0,
            calcario_kg: 0.15,
            fertilizante_kg: 0.005,
            palhada_kg: 0.0,
        }),
        _ => None,
    }
}

pub fn estimate(cultura: &str, area_m2: f64) -> Result<Estimativa, AgronomyError> {
    let per_m2 = reference(cultura).ok_or_else(|| AgronomyError::UnknownCrop(cultura.to_string()))?;
    Ok(Estimativa {
        mudas: per_m2.mudas * area_m2,
        calcario_kg: per_m2.calcario_kg * area_m2,
        fertilizante_kg: per_m2.fertilizante_kg * area_m2,
        palhada_kg: per_m2.palhada_kg * area_m2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soja_scales_with_area() {
        let e = estimate("Soja", 5000.0).unwrap();
        assert_eq!(e.mudas, 150_000.0);
        assert!((e.calcario_kg - 750.0).abs() < 1e-9);
        assert!((e.fertilizante_kg - 25.0).abs() < 1e-9);
        assert_eq!(e.palhada_kg, 0.0);
    }

    #[test]
    fn cafe_uses_one_seedling_per_2_8_m2() {
        let e = estimate("cafe", 28.0).unwrap();
        assert!((e.mudas - 10.0).abs() < 1e-9);
        assert!((e.palhada_kg - 140.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_crop_is_an_error() {
        assert_eq!(
            estimate("milho", 1.0),
            Err(AgronomyError::UnknownCrop("milho".into()))
        );
    }
}
