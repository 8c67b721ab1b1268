use super::*;
use crate::algebra::*;
use std::collections::HashMap;
use std::iter::zip;
use std::ops::Range;

// -------------------------------------
// default composite cone type
// -------------------------------------

/// Product of the cones assigned to consecutive row blocks.
pub struct CompositeCone<T: FloatT = f64> {
    cones: Vec<SupportedCone<T>>,

    //Type count for each cone type
    pub(crate) type_counts: HashMap<SupportedConeTag, usize>,

    //overall size of the composite cone
    pub(crate) numel: usize,

    //ranges for the indices of the constituent cones
    pub(crate) rng_cones: Vec<Range<usize>>,
}

impl<T> CompositeCone<T>
where
    T: FloatT,
{
    pub fn new(types: &[SupportedConeT<T>]) -> Self {
        let mut cones: Vec<SupportedCone<T>> = Vec::with_capacity(types.len());
        let mut type_counts = HashMap::new();

        for t in types.iter() {
            let cone = make_cone(t);
            *type_counts.entry(cone.as_tag()).or_insert(0) += 1;
            cones.push(cone);
        }

        let numel = cones.iter().map(|c| c.numel()).sum();
        let rng_cones = _make_rng_cones(&cones);

        Self {
            cones,
            type_counts,
            numel,
            rng_cones,
        }
    }

    pub fn len(&self) -> usize {
        self.cones.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cones.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, SupportedCone<T>> {
        self.cones.iter()
    }
    pub(crate) fn get_type_count(&self, tag: SupportedConeTag) -> usize {
        self.type_counts.get(&tag).copied().unwrap_or(0)
    }

    /// `e = x - Π(x)`, the vector from the projection back to `x`
    pub fn distance(&self, e: &mut [T], x: &[T], pd: PrimalOrDualCone) -> Result<(), ConeError> {
        e.copy_from(x);
        self.project(e, pd)?;
        e.axpby(T::one(), x, -T::one());
        Ok(())
    }

    /// Block diagonal Jacobian of the projection at `x`
    pub fn jacobian(
        &self,
        x: &[T],
        pd: PrimalOrDualCone,
    ) -> Result<CompositeJacobian<T>, ConeError> {
        let blocks = zip(&self.cones, &self.rng_cones)
            .map(|(cone, rng)| cone.projection_jacobian(&x[rng.clone()], pd))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CompositeJacobian {
            blocks,
            rngs: self.rng_cones.clone(),
        })
    }
}

fn _make_rng_cones<T>(cones: &[SupportedCone<T>]) -> Vec<Range<usize>>
where
    T: FloatT,
{
    let mut rngs = Vec::with_capacity(cones.len());
    let mut start = 0;
    for cone in cones {
        let stop = start + cone.numel();
        rngs.push(start..stop);
        start = stop;
    }
    rngs
}

// the product cone applies each operation blockwise

impl<T> CompositeCone<T>
where
    T: FloatT,
{
    pub fn numel(&self) -> usize {
        self.numel
    }

    /// Absorbs a row scaling into each constituent cone
    pub fn rectify_equilibration(&mut self, e: &[T]) {
        for (cone, rng) in zip(&mut self.cones, &self.rng_cones) {
            cone.rectify_equilibration(&e[rng.clone()]);
        }
    }

    /// In place projection onto the product cone or its dual
    pub fn project(&self, x: &mut [T], pd: PrimalOrDualCone) -> Result<(), ConeError> {
        for (cone, rng) in zip(&self.cones, &self.rng_cones) {
            cone.project(&mut x[rng.clone()], pd)?;
        }
        Ok(())
    }
}
