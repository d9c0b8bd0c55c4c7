//! Ready-made default providers.
//!
//! Each returns a [`DefaultValue::Provider`], so every entity draws its own
//! value:
//!
//! ```
//! use scenarious_model::{defaults, EntitySchema};
//!
//! let actor = EntitySchema::new("actor")
//!     .require("name")
//!     .default_from("age", defaults::int_between(18, 80));
//! assert!(actor.validate().is_ok());
//! ```

use crate::DefaultValue;
use rand::seq::SliceRandom;
use rand::Rng;
use scenarious_types::Value;
use std::cell::Cell;
use std::rc::Rc;

/// Picks uniformly from `choices`. An empty set yields `Null`.
pub fn one_of<I, V>(choices: I) -> DefaultValue
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let choices: Vec<Value> = choices.into_iter().map(Into::into).collect();
    DefaultValue::Provider(Rc::new(move || {
        choices
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }))
}

/// Uniform integer in `low..=high`. The bounds are swapped if reversed.
pub fn int_between(low: i64, high: i64) -> DefaultValue {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    DefaultValue::Provider(Rc::new(move || {
        Value::Int(rand::thread_rng().gen_range(low..=high))
    }))
}

/// `"<prefix>1"`, `"<prefix>2"`, ... counting per provider.
pub fn sequence(prefix: &str) -> DefaultValue {
    let prefix = prefix.to_string();
    let next = Rc::new(Cell::new(1_u64));
    DefaultValue::Provider(Rc::new(move || {
        let n = next.get();
        next.set(n + 1);
        Value::Str(format!("{prefix}{n}"))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_of_stays_within_choices() {
        let provider = one_of(["a", "b", "c"]);
        for _ in 0..50 {
            let v = provider.produce();
            assert!(matches!(v.as_str(), Some("a" | "b" | "c")));
        }
    }

    #[test]
    fn one_of_empty_is_null() {
        let provider = one_of(Vec::<Value>::new());
        assert!(provider.produce().is_null());
    }

    #[test]
    fn int_between_respects_bounds_even_when_reversed() {
        let provider = int_between(80, 18);
        for _ in 0..100 {
            let n = provider.produce().as_i64().unwrap();
            assert!((18..=80).contains(&n));
        }
    }

    #[test]
    fn sequence_counts_up() {
        let provider = sequence("user-");
        assert_eq!(provider.produce(), Value::from("user-1"));
        assert_eq!(provider.produce(), Value::from("user-2"));
    }
}
