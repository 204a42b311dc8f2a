use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::{
    abundances::ElementAbundances,
    config::AbundanceConfig,
    error::{AbundanceError, ReferenceLookupError},
    isotope::IsotopeSet,
    reference::{ReferenceTables, SolarReference},
    selection::Selection,
};

/// Parameters of the chemical evolution run the masses come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimulationParams {
    pub sim_id: String,
    /// Identifier of the yield set used by the simulation.
    pub yields: String,
}

/// Output of a chemical evolution simulation.
pub trait ChemEvolution {
    /// Labels of the tracked isotopes, e.g. `Fe56`.
    fn isotopes(&self) -> &[String];

    /// Gas mass of each isotope, indexed by timestep and isotope.
    fn mgas_iso(&self) -> ArrayView2<'_, f64>;

    /// Number of stars formed at each timestep still alive at the end.
    fn survivors(&self) -> ArrayView1<'_, u64>;

    /// Time of each step, in Myr.
    fn time(&self) -> ArrayView1<'_, f64>;

    fn params(&self) -> &SimulationParams;
}

/// Owned simulation output, for callers holding raw arrays.
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    pub isotopes: Vec<String>,
    pub mgas_iso: Array2<f64>,
    pub survivors: Array1<u64>,
    pub time: Array1<f64>,
    pub params: SimulationParams,
}

impl ChemEvolution for SimulationOutput {
    fn isotopes(&self) -> &[String] {
        &self.isotopes
    }

    fn mgas_iso(&self) -> ArrayView2<'_, f64> {
        self.mgas_iso.view()
    }

    fn survivors(&self) -> ArrayView1<'_, u64> {
        self.survivors.view()
    }

    fn time(&self) -> ArrayView1<'_, f64> {
        self.time.view()
    }

    fn params(&self) -> &SimulationParams {
        &self.params
    }
}

/// Abundances of the gas of a simulation.
#[derive(Debug, Clone)]
pub struct Abundances {
    isotopes: IsotopeSet,
    mgas_iso: Array2<f64>,
    survivors: Array1<u64>,
    time: Array1<f64>,
    params: SimulationParams,
    tables: ReferenceTables,
    solar: SolarReference,
    all: ElementAbundances,
    selection: Selection,
}

impl Abundances {
    /// Compute abundances with the bundled reference tables.
    pub fn new<C: ChemEvolution + ?Sized>(
        sim: &C,
        config: &AbundanceConfig,
    ) -> Result<Self, AbundanceError> {
        Self::with_tables(sim, ReferenceTables::bundled(config.solar), config)
    }

    /// Compute abundances with already loaded reference tables, whose solar
    /// source takes precedence over `config.solar`.
    pub fn with_tables<C: ChemEvolution + ?Sized>(
        sim: &C,
        tables: ReferenceTables,
        config: &AbundanceConfig,
    ) -> Result<Self, AbundanceError> {
        if tables.solar().source() != config.solar {
            log::warn!(
                "using {} solar abundances instead of configured {}",
                tables.solar().source(),
                config.solar
            );
        }
        let isotopes = IsotopeSet::from_labels(sim.isotopes())?;
        log::debug!(
            "{}: {} isotopes of {} elements",
            sim.params().sim_id,
            isotopes.n_isotopes(),
            isotopes.n_elements()
        );
        let solar = tables.solar_reference(isotopes.elements())?;
        let mgas_iso = sim.mgas_iso();
        let all = ElementAbundances::compute(mgas_iso, &isotopes, &solar, config.degenerate)?;
        let selection = Selection::select(
            all.xfe_all.view(),
            &isotopes,
            tables.atomic_numbers(),
            config.elements.as_slice(),
        )?;
        log::debug!(
            "{}: abundances over {} steps, {} elements selected",
            sim.params().sim_id,
            all.n_reported_steps(),
            selection.len()
        );
        Ok(Self {
            isotopes,
            mgas_iso: mgas_iso.to_owned(),
            survivors: sim.survivors().to_owned(),
            time: sim.time().to_owned(),
            params: sim.params().clone(),
            tables,
            solar,
            all,
            selection,
        })
    }

    /// Replace the selection with the elements `el`, in that order.
    ///
    /// The previous selection is kept if any element is unknown.
    pub fn select_elements<S: AsRef<str>>(
        &mut self,
        el: &[S],
    ) -> Result<(), ReferenceLookupError> {
        self.selection = Selection::select(
            self.all.xfe_all.view(),
            &self.isotopes,
            self.tables.atomic_numbers(),
            el,
        )?;
        Ok(())
    }

    pub fn isotopes(&self) -> &IsotopeSet {
        &self.isotopes
    }

    /// Simulated elements, in the row order of `xh_all` and `xfe_all`.
    pub fn elements(&self) -> impl Iterator<Item = &str> + '_ {
        self.isotopes.elements()
    }

    pub fn n_elements(&self) -> usize {
        self.isotopes.n_elements()
    }

    pub fn element_index(&self, symbol: &str) -> Option<usize> {
        self.isotopes.element_index(symbol)
    }

    /// Number of simulation timesteps, including the initial one which has
    /// no abundances.
    pub fn n_steps(&self) -> usize {
        self.mgas_iso.nrows()
    }

    pub fn mgas_iso(&self) -> ArrayView2<'_, f64> {
        self.mgas_iso.view()
    }

    pub fn survivors(&self) -> ArrayView1<'_, u64> {
        self.survivors.view()
    }

    pub fn time(&self) -> ArrayView1<'_, f64> {
        self.time.view()
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn sim_id(&self) -> &str {
        &self.params.sim_id
    }

    pub fn solar_h(&self) -> ArrayView1<'_, f64> {
        self.solar.solar_h.view()
    }

    pub fn solar_fe(&self) -> ArrayView1<'_, f64> {
        self.solar.solar_fe.view()
    }

    pub fn xh_all(&self) -> ArrayView2<'_, f64> {
        self.all.xh_all.view()
    }

    pub fn xfe_all(&self) -> ArrayView2<'_, f64> {
        self.all.xfe_all.view()
    }

    pub fn feh(&self) -> ArrayView1<'_, f64> {
        self.all.feh.view()
    }

    /// `[X/H]` of one element.
    pub fn xh(&self, symbol: &str) -> Option<ArrayView1<'_, f64>> {
        self.element_index(symbol).map(|i| self.all.xh_all.row(i))
    }

    /// `[X/Fe]` of one element.
    pub fn xfe_of(&self, symbol: &str) -> Option<ArrayView1<'_, f64>> {
        self.element_index(symbol).map(|i| self.all.xfe_all.row(i))
    }

    /// `[X/Fe]` of the selected elements.
    pub fn xfe(&self) -> ArrayView2<'_, f64> {
        self.selection.xfe.view()
    }

    pub fn elements_out(&self) -> &[String] {
        &self.selection.elements_out
    }

    pub fn atomic_num_out(&self) -> &[u32] {
        &self.selection.atomic_num_out
    }
}

/// Compute abundances from raw simulation arrays, keeping the default
/// elements.
pub fn calc_abundances<S: AsRef<str>>(
    sym: &[S],
    mgas: Array2<f64>,
    survivors: Array1<u64>,
    time: Array1<f64>,
    parameters: SimulationParams,
) -> Result<Abundances, AbundanceError> {
    let sim = SimulationOutput {
        isotopes: sym.iter().map(|s| s.as_ref().to_owned()).collect(),
        mgas_iso: mgas,
        survivors,
        time,
        params: parameters,
    };
    Abundances::new(&sim, &AbundanceConfig::default())
}
