use ndarray::{Array2, ArrayView2, Axis};

use crate::{
    error::{ReferenceLookupError, Table},
    isotope::IsotopeSet,
    reference::AtomicNumbers,
};

/// `[X/Fe]` of a subset of elements, in the requested order.
#[derive(Debug, Clone)]
pub struct Selection {
    pub xfe: Array2<f64>,
    pub elements_out: Vec<String>,
    pub atomic_num_out: Vec<u32>,
}

impl Selection {
    /// Pick the rows of `xfe_all` for the elements `el`.
    ///
    /// Every requested element must be simulated and have an atomic number.
    pub fn select<S: AsRef<str>>(
        xfe_all: ArrayView2<'_, f64>,
        isotopes: &IsotopeSet,
        atomic_numbers: &AtomicNumbers,
        el: &[S],
    ) -> Result<Self, ReferenceLookupError> {
        let mut rows = Vec::with_capacity(el.len());
        let mut elements_out = Vec::with_capacity(el.len());
        let mut atomic_num_out = Vec::with_capacity(el.len());
        for symbol in el.iter().map(AsRef::as_ref) {
            let row = isotopes
                .element_index(symbol)
                .ok_or_else(|| ReferenceLookupError {
                    symbol: symbol.to_owned(),
                    table: Table::Elements,
                })?;
            rows.push(row);
            atomic_num_out.push(atomic_numbers.get(symbol)?);
            elements_out.push(symbol.to_owned());
        }
        Ok(Self {
            xfe: xfe_all.select(Axis(0), &rows),
            elements_out,
            atomic_num_out,
        })
    }

    pub fn len(&self) -> usize {
        self.elements_out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements_out.is_empty()
    }
}
