use flexce_abundances::{
    pipeline, AbundanceConfig, AbundanceError, DegeneratePolicy, SimulationOutput,
    SimulationParams,
};
use numpy::{
    ndarray::Array1, PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2, ToPyArray,
};
use pyo3::{
    exceptions::{PyKeyError, PyValueError},
    prelude::*,
};

pub(crate) fn to_py_err(err: AbundanceError) -> PyErr {
    match err {
        AbundanceError::Lookup(e) => PyKeyError::new_err(e.to_string()),
        e => PyValueError::new_err(e.to_string()),
    }
}

fn simulation(
    sym: Vec<String>,
    mgas: PyReadonlyArray2<'_, f64>,
    survivors: PyReadonlyArray1<'_, i64>,
    time: PyReadonlyArray1<'_, f64>,
    sim_id: String,
    yields: String,
) -> PyResult<SimulationOutput> {
    let survivors = survivors
        .as_array()
        .iter()
        .map(|&n| u64::try_from(n))
        .collect::<Result<Array1<u64>, _>>()
        .map_err(|_| PyValueError::new_err("survivor counts should not be negative"))?;
    Ok(SimulationOutput {
        isotopes: sym,
        mgas_iso: mgas.as_array().to_owned(),
        survivors,
        time: time.as_array().to_owned(),
        params: SimulationParams { sim_id, yields },
    })
}

/// Abundances of the gas of a chemical evolution simulation.
#[pyclass]
pub struct Abundances(pipeline::Abundances);

#[pymethods]
impl Abundances {
    #[new]
    #[pyo3(signature = (
        sym, mgas, survivors, time, sim_id, yields,
        solar = "lodders", elements = None, strict = false
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sym: Vec<String>,
        mgas: PyReadonlyArray2<'_, f64>,
        survivors: PyReadonlyArray1<'_, i64>,
        time: PyReadonlyArray1<'_, f64>,
        sim_id: String,
        yields: String,
        solar: &str,
        elements: Option<Vec<String>>,
        strict: bool,
    ) -> PyResult<Self> {
        let mut config = AbundanceConfig::default()
            .with_solar_source(solar)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        if let Some(elements) = elements {
            config = config.with_elements(elements.as_slice());
        }
        if strict {
            config = config.with_degenerate(DegeneratePolicy::Fail);
        }
        let sim = simulation(sym, mgas, survivors, time, sim_id, yields)?;
        pipeline::Abundances::new(&sim, &config)
            .map(Self)
            .map_err(to_py_err)
    }

    /// Restrict `xfe` to the elements `el`, in that order.
    pub fn select_elements(&mut self, el: Vec<String>) -> PyResult<()> {
        self.0
            .select_elements(el.as_slice())
            .map_err(|e| to_py_err(e.into()))
    }

    #[getter]
    pub fn sim_id(&self) -> &str {
        self.0.sim_id()
    }

    #[getter]
    pub fn n_steps(&self) -> usize {
        self.0.n_steps()
    }

    #[getter]
    pub fn elements(&self) -> Vec<String> {
        self.0.elements().map(str::to_owned).collect()
    }

    #[getter]
    pub fn xh_all<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        self.0.xh_all().to_pyarray(py)
    }

    #[getter]
    pub fn xfe_all<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        self.0.xfe_all().to_pyarray(py)
    }

    #[getter]
    pub fn feh<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.0.feh().to_pyarray(py)
    }

    #[getter]
    pub fn solar_h<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.0.solar_h().to_pyarray(py)
    }

    #[getter]
    pub fn solar_fe<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.0.solar_fe().to_pyarray(py)
    }

    #[getter]
    pub fn xfe<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        self.0.xfe().to_pyarray(py)
    }

    #[getter]
    pub fn elements_out(&self) -> Vec<String> {
        self.0.elements_out().to_vec()
    }

    #[getter]
    pub fn atomic_num_out(&self) -> Vec<u32> {
        self.0.atomic_num_out().to_vec()
    }

    #[getter]
    pub fn t<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.0.time().to_pyarray(py)
    }
}

/// Abundances of a simulation given as raw arrays, for the default elements.
#[pyfunction]
pub fn calc_abundances(
    sym: Vec<String>,
    mgas: PyReadonlyArray2<'_, f64>,
    survivors: PyReadonlyArray1<'_, i64>,
    time: PyReadonlyArray1<'_, f64>,
    sim_id: String,
    yields: String,
) -> PyResult<Abundances> {
    let sim = simulation(sym, mgas, survivors, time, sim_id, yields)?;
    pipeline::calc_abundances(
        sim.isotopes.as_slice(),
        sim.mgas_iso,
        sim.survivors,
        sim.time,
        sim.params,
    )
    .map(Abundances)
    .map_err(to_py_err)
}
