use ndarray::{s, Array1, Array2, ArrayView2, Axis};

use crate::{
    config::DegeneratePolicy,
    error::{AbundanceError, DegenerateAbundanceError, ReferenceLookupError, ShapeError, Table},
    isotope::IsotopeSet,
    reference::SolarReference,
};

/// Number of atoms (in units of the atomic mass unit) of each isotope in the
/// gas, indexed by timestep and isotope.
pub fn number_densities(mgas_iso: ArrayView2<'_, f64>, isotopes: &IsotopeSet) -> Array2<f64> {
    let mass_numbers: Array1<f64> = isotopes.mass_numbers().map(f64::from).collect();
    &mgas_iso / &mass_numbers
}

/// Isotope number densities relative to the total of the isotopes at
/// `indices`, for every timestep but the first.
fn normalized_to(ngas_iso: ArrayView2<'_, f64>, indices: &[usize]) -> Array2<f64> {
    let ngas_iso = ngas_iso.slice(s![1.., ..]);
    let norm = ngas_iso.select(Axis(1), indices).sum_axis(Axis(1));
    &ngas_iso / &norm.insert_axis(Axis(1))
}

/// Sum the isotope columns of `niso` by element, one row per element.
fn sum_by_element(niso: ArrayView2<'_, f64>, isotopes: &IsotopeSet) -> Array2<f64> {
    let mut sums = Array2::zeros((isotopes.n_elements(), niso.nrows()));
    for (mut row, group) in sums.outer_iter_mut().zip(isotopes.groups()) {
        row.assign(&niso.select(Axis(1), &group.indices).sum_axis(Axis(1)));
    }
    sums
}

fn element_row(isotopes: &IsotopeSet, symbol: &str) -> Result<usize, ReferenceLookupError> {
    isotopes
        .element_index(symbol)
        .ok_or_else(|| ReferenceLookupError {
            symbol: symbol.to_owned(),
            table: Table::Elements,
        })
}

/// Solar-normalized abundances of every simulated element.
///
/// Rows follow the element order of the [`IsotopeSet`]; columns are the
/// timesteps `1..n_steps`, the initial state being left out.
#[derive(Debug, Clone)]
pub struct ElementAbundances {
    /// `[X/H]`
    pub xh_all: Array2<f64>,
    /// `[X/Fe]`
    pub xfe_all: Array2<f64>,
    /// `[Fe/H]`, the iron row of `xh_all`.
    pub feh: Array1<f64>,
}

impl ElementAbundances {
    pub fn compute(
        mgas_iso: ArrayView2<'_, f64>,
        isotopes: &IsotopeSet,
        solar: &SolarReference,
        policy: DegeneratePolicy,
    ) -> Result<Self, AbundanceError> {
        let (n_steps, n_cols) = mgas_iso.dim();
        if n_cols != isotopes.n_isotopes() {
            return Err(ShapeError::IsotopeCount {
                expected: isotopes.n_isotopes(),
                found: n_cols,
            }
            .into());
        }
        if n_steps < 2 {
            return Err(ShapeError::TooFewSteps(n_steps).into());
        }
        for found in [solar.solar_h.len(), solar.solar_fe.len()] {
            if found != isotopes.n_elements() {
                return Err(ShapeError::SolarCount {
                    expected: isotopes.n_elements(),
                    found,
                }
                .into());
            }
        }
        let i_h = element_row(isotopes, "H")?;
        let i_fe = element_row(isotopes, "Fe")?;

        let ngas_iso = number_densities(mgas_iso, isotopes);
        let niso_h = normalized_to(ngas_iso.view(), &isotopes.groups()[i_h].indices);
        let niso_fe = normalized_to(ngas_iso.view(), &isotopes.groups()[i_fe].indices);

        let xh_abs = sum_by_element(niso_h.view(), isotopes).mapv_into(|n| n.log10() + 12.0);
        let xfe_abs = sum_by_element(niso_fe.view(), isotopes).mapv_into(f64::log10);

        let xh_all = &xh_abs - &solar.solar_h.view().insert_axis(Axis(1));
        let xfe_all = &xfe_abs - &solar.solar_fe.view().insert_axis(Axis(1));
        let feh = xh_all.row(i_fe).to_owned();

        let abundances = Self {
            xh_all,
            xfe_all,
            feh,
        };
        abundances.check_finite(isotopes, policy)?;
        Ok(abundances)
    }

    /// Number of reported timesteps.
    pub fn n_reported_steps(&self) -> usize {
        self.xh_all.ncols()
    }

    fn check_finite(
        &self,
        isotopes: &IsotopeSet,
        policy: DegeneratePolicy,
    ) -> Result<(), DegenerateAbundanceError> {
        let degenerate = self
            .xh_all
            .indexed_iter()
            .chain(self.xfe_all.indexed_iter())
            .filter(|(_, v)| !v.is_finite());
        match policy {
            DegeneratePolicy::Propagate => {
                let count = degenerate.count();
                if count > 0 {
                    log::warn!("{count} abundances are not finite");
                }
                Ok(())
            }
            DegeneratePolicy::Fail => match degenerate.min_by_key(|&((_, j), _)| j) {
                Some(((i, j), &value)) => Err(DegenerateAbundanceError {
                    element: isotopes.groups()[i].symbol.clone(),
                    // step 0 is not part of the result
                    step: j + 1,
                    value,
                }),
                None => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, arr2, Array2, Axis};

    use crate::{
        config::DegeneratePolicy,
        error::{AbundanceError, ShapeError, Table},
        is_close::IsClose,
        isotope::IsotopeSet,
        reference::{ReferenceTables, SolarReference},
    };

    use super::{number_densities, ElementAbundances};

    fn compute(
        labels: &[&str],
        mgas_iso: &Array2<f64>,
        policy: DegeneratePolicy,
    ) -> Result<(IsotopeSet, ElementAbundances), AbundanceError> {
        let isotopes = IsotopeSet::from_labels(labels)?;
        let solar = ReferenceTables::default().solar_reference(isotopes.elements())?;
        let abundances = ElementAbundances::compute(mgas_iso.view(), &isotopes, &solar, policy)?;
        Ok((isotopes, abundances))
    }

    #[test]
    fn divide_by_mass_number() {
        let isotopes = IsotopeSet::from_labels(&["H1", "He4", "Fe56"]).expect("valid labels");
        let ngas = number_densities(arr2(&[[2.0, 8.0, 112.0]]).view(), &isotopes);
        assert!(ngas.is_close(&arr2(&[[2.0, 2.0, 2.0]])));
    }

    #[test]
    fn first_step_is_excluded() {
        let mgas = arr2(&[[0.0, 0.0, 0.0], [10.0, 1.0, 0.1], [10.0, 2.0, 0.2]]);
        let (_, ab) = compute(&["H1", "Fe56", "Fe58"], &mgas, DegeneratePolicy::Propagate)
            .expect("valid inputs");
        assert_eq!(ab.xh_all.dim(), (2, 2));
        assert_eq!(ab.xfe_all.dim(), (2, 2));
        assert_eq!(ab.feh.len(), 2);
        assert_eq!(ab.n_reported_steps(), 2);
    }

    #[test]
    fn hand_computed_values() {
        let mgas = arr2(&[[1.0, 1.0, 1.0], [10.0, 1.0, 0.1]]);
        let (isotopes, ab) =
            compute(&["H1", "Fe56", "Fe58"], &mgas, DegeneratePolicy::Fail).expect("valid inputs");
        let i_h = isotopes.element_index("H").expect("H simulated");
        let i_fe = isotopes.element_index("Fe").expect("Fe simulated");

        let n_fe_per_h: f64 = (1.0 / 56.0 + 0.1 / 58.0) / 10.0;
        let feh = n_fe_per_h.log10() + 12.0 - 7.47;
        assert!(ab.xh_all[[i_fe, 0]].is_close(feh));
        assert!(ab.xh_all[[i_h, 0]].is_close(0.0));
        // [Fe/Fe] is zero by construction
        assert!(ab.xfe_all[[i_fe, 0]].is_close(0.0));
        // [H/Fe] = -[Fe/H]
        assert!(ab.xfe_all[[i_h, 0]].is_close(-feh));
    }

    #[test]
    fn feh_is_iron_row() {
        let mgas = arr2(&[
            [1.0, 0.1, 0.01, 0.02],
            [0.9, 0.12, 0.013, 0.03],
            [0.8, 0.14, 0.021, 0.05],
            [0.7, 0.16, 0.034, 0.08],
        ]);
        let (isotopes, ab) = compute(
            &["H1", "O16", "Fe56", "Mg24"],
            &mgas,
            DegeneratePolicy::Fail,
        )
        .expect("valid inputs");
        let i_fe = isotopes.element_index("Fe").expect("Fe simulated");
        assert_eq!(ab.feh, ab.xh_all.row(i_fe));
    }

    #[test]
    fn constant_mass_ratio_gives_constant_abundance() {
        let ratios = arr1(&[1.0, 3.0, 0.5]);
        let mgas = &arr2(&[[1.0], [2.0], [7.5], [100.0], [1e-3]]) * &ratios;
        let (_, ab) =
            compute(&["H1", "O16", "Fe56"], &mgas, DegeneratePolicy::Fail).expect("valid inputs");
        for row in ab.xh_all.axis_iter(Axis(0)) {
            assert!(row.iter().all(|&v| v.is_close(row[0])));
        }
    }

    #[test]
    fn element_without_mass_propagates() {
        let mgas = arr2(&[[1.0, 0.1, 0.0], [1.0, 0.1, 0.0], [1.0, 0.1, 0.01]]);
        let (isotopes, ab) = compute(&["H1", "Fe56", "O16"], &mgas, DegeneratePolicy::Propagate)
            .expect("degenerate values are kept");
        let i_o = isotopes.element_index("O").expect("O simulated");
        assert_eq!(ab.xh_all[[i_o, 0]], f64::NEG_INFINITY);
        assert_eq!(ab.xfe_all[[i_o, 0]], f64::NEG_INFINITY);
        assert!(ab.xh_all[[i_o, 1]].is_finite());
    }

    #[test]
    fn element_without_mass_fails() {
        let mgas = arr2(&[[1.0, 0.1, 0.0], [1.0, 0.1, 0.01], [1.0, 0.1, 0.0]]);
        let err = compute(&["H1", "Fe56", "O16"], &mgas, DegeneratePolicy::Fail)
            .expect_err("O has no mass at step 2");
        match err {
            AbundanceError::Degenerate(e) => {
                assert_eq!(e.element, "O");
                assert_eq!(e.step, 2);
            }
            e => panic!("unexpected error {e}"),
        }
    }

    #[test]
    fn hydrogen_and_iron_are_required() {
        let mgas = arr2(&[[1.0, 0.1], [1.0, 0.1]]);
        for labels in [["H1", "O16"], ["O16", "Fe56"]] {
            match compute(&labels, &mgas, DegeneratePolicy::Propagate) {
                Err(AbundanceError::Lookup(e)) => assert_eq!(e.table, Table::Elements),
                other => panic!("unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn shape_mismatch() {
        let mgas = arr2(&[[1.0, 0.1], [1.0, 0.1]]);
        assert!(matches!(
            compute(&["H1", "Fe56", "O16"], &mgas, DegeneratePolicy::Propagate),
            Err(AbundanceError::Shape(ShapeError::IsotopeCount {
                expected: 3,
                found: 2
            }))
        ));
        let mgas = arr2(&[[1.0, 0.1]]);
        assert!(matches!(
            compute(&["H1", "Fe56"], &mgas, DegeneratePolicy::Propagate),
            Err(AbundanceError::Shape(ShapeError::TooFewSteps(1)))
        ));
    }

    #[test]
    fn solar_reference_mismatch() {
        let mgas = arr2(&[[1.0, 0.1], [1.0, 0.1]]);
        let isotopes = IsotopeSet::from_labels(&["H1", "Fe56"]).expect("valid labels");
        let short_h = SolarReference {
            solar_h: arr1(&[12.0]),
            solar_fe: arr1(&[4.53, 0.0]),
        };
        let short_fe = SolarReference {
            solar_h: arr1(&[12.0, 7.47]),
            solar_fe: arr1(&[4.53]),
        };
        for solar in [short_h, short_fe] {
            assert!(matches!(
                ElementAbundances::compute(mgas.view(), &isotopes, &solar, DegeneratePolicy::Fail),
                Err(AbundanceError::Shape(ShapeError::SolarCount {
                    expected: 2,
                    found: 1
                }))
            ));
        }
    }
}
