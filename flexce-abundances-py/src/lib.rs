use flexce_abundances::{DEFAULT_ELEMENTS, VERSION};
use pyo3::prelude::*;

mod abundances;

#[pymodule]
#[pyo3(name = "flexce_abundances")]
fn flexce_abundances_py(pymod: &Bound<'_, PyModule>) -> PyResult<()> {
    pymod.add_class::<abundances::Abundances>()?;
    pymod.add_function(wrap_pyfunction!(abundances::calc_abundances, pymod)?)?;
    pymod.add("DEFAULT_ELEMENTS", DEFAULT_ELEMENTS.to_vec())?;
    pymod.add("__version__", VERSION)?;
    Ok(())
}
