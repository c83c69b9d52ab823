// fw-core/src/units.rs

use uom::si::f64::{
    Length as UomLength, Mass as UomMass, MomentOfInertia as UomMomentOfInertia,
    Torque as UomTorque,
};

// Public canonical unit types (SI, f64)
pub type Length = UomLength;
pub type Mass = UomMass;
pub type MomentOfInertia = UomMomentOfInertia;
pub type Torque = UomTorque;

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn nm(v: f64) -> Torque {
    use uom::si::torque::newton_meter;
    Torque::new::<newton_meter>(v)
}

/// Raw SI value of a torque (N·m).
#[inline]
pub fn nm_value(t: Torque) -> f64 {
    use uom::si::torque::newton_meter;
    t.get::<newton_meter>()
}

#[inline]
pub fn kg_m2(v: f64) -> MomentOfInertia {
    use uom::si::moment_of_inertia::kilogram_square_meter;
    MomentOfInertia::new::<kilogram_square_meter>(v)
}

/// Raw SI value of a moment of inertia (kg·m²).
#[inline]
pub fn kg_m2_value(i: MomentOfInertia) -> f64 {
    use uom::si::moment_of_inertia::kilogram_square_meter;
    i.get::<kilogram_square_meter>()
}

/// Moment of inertia of a solid disc about its axis: `I = 0.5 * m * r²`.
pub fn disc_inertia(mass: Mass, radius: Length) -> MomentOfInertia {
    use uom::si::length::meter;
    use uom::si::mass::kilogram;
    let mass_kg = mass.get::<kilogram>();
    let r = radius.get::<meter>();
    kg_m2(0.5 * mass_kg * (r * r))
}
