use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Energy and macros. Either a per-100 g profile or an absolute amount,
/// depending on where it is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    pub calories: f64,
    pub protein: f64,
    pub fats: f64,
    pub carbohydrates: f64,
}

impl Nutrients {
    pub const ZERO: Nutrients = Nutrients {
        calories: 0.0,
        protein: 0.0,
        fats: 0.0,
        carbohydrates: 0.0,
    };

    pub fn scale(&self, factor: f64) -> Nutrients {
        Nutrients {
            calories: self.calories * factor,
            protein: self.protein * factor,
            fats: self.fats * factor,
            carbohydrates: self.carbohydrates * factor,
        }
    }

    /// Amount contained in `mass` grams of food with this per-100 g profile.
    pub fn scaled_to(&self, mass: f64) -> Nutrients {
        self.scale(mass / 100.0)
    }
}

impl Add for Nutrients {
    type Output = Nutrients;

    fn add(self, rhs: Nutrients) -> Nutrients {
        Nutrients {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            fats: self.fats + rhs.fats,
            carbohydrates: self.carbohydrates + rhs.carbohydrates,
        }
    }
}

impl AddAssign for Nutrients {
    fn add_assign(&mut self, rhs: Nutrients) {
        *self = *self + rhs;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub total_nutrients: Nutrients,
    pub total_mass: f64,
    pub nutrients_per_100g: Nutrients,
}

/// Combines `(per-100 g profile, grams)` pairs into recipe totals.
///
/// Masses are expected to be finite and non-negative. An empty input, or one
/// whose masses sum to zero, yields a zero per-100 g profile.
pub fn aggregate<'a, I>(items: I) -> Aggregate
where
    I: IntoIterator<Item = (&'a Nutrients, f64)>,
{
    let mut total_nutrients = Nutrients::ZERO;
    let mut total_mass = 0.0;
    for (profile, mass) in items {
        total_nutrients += profile.scaled_to(mass);
        total_mass += mass;
    }

    let nutrients_per_100g = if total_mass > 0.0 {
        total_nutrients.scale(100.0 / total_mass)
    } else {
        Nutrients::ZERO
    };

    Aggregate {
        total_nutrients,
        total_mass,
        nutrients_per_100g,
    }
}
