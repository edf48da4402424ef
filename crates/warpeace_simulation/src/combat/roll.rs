//! Damage roll
//!
//! Формула:
//! - base ~ UniformInt[min_damage, max_damage] (включительно)
//! - crit_roll ~ UniformReal[0, 100) — полуоткрытый интервал!
//! - critical_chance > crit_roll → round(base × critical_multiplier)
//!
//! Полуоткрытый интервал даёт точные границы: chance = 0 никогда не критует,
//! chance = 100 критует всегда.

use rand::Rng;

use crate::combat::CombatAction;

/// Результат броска
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRoll {
    pub amount: u32,
    pub critical: bool,
}

/// Бросок урона (или лечения) для action
///
/// Чистая функция от action + RNG. В симуляции RNG — `DeterministicRng`,
/// в тестах можно подставить любой seeded генератор.
pub fn roll_damage<R: Rng + ?Sized>(action: &CombatAction, rng: &mut R) -> DamageRoll {
    let profile = &action.profile;
    let base = rng.gen_range(profile.min_damage()..=profile.max_damage());
    let crit_roll: f32 = rng.gen_range(0.0..100.0);

    if profile.critical_chance() > crit_roll {
        let amount = (base as f32 * profile.critical_multiplier()).round() as u32;
        DamageRoll {
            amount,
            critical: true,
        }
    } else {
        DamageRoll {
            amount: base,
            critical: false,
        }
    }
}
