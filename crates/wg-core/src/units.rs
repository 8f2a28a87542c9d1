// wg-core/src/units.rs

use uom::si::f64::Pressure as UomPressure;

// Public canonical unit types (SI, f64)
pub type Pressure = UomPressure;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

/// Pressure in bar, the unit decks and reports use.
#[inline]
pub fn to_bar(p: Pressure) -> f64 {
    use uom::si::pressure::bar;
    p.get::<bar>()
}
