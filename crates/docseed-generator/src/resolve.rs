//! Option resolution: turning a field's configured options into one value.

use crate::options::{FieldOptions, OptionSource};
use crate::random;
use docseed_core::{DataPool, FieldValue};
use tracing::warn;

/// Resolve a field's configured options to a single value.
///
/// With a dependency accessor configured, the accessor runs against the
/// pool; a non-empty dependency is handed to the configured derive
/// function. Without one, a static list yields a uniform random element.
/// Every failure mode degrades to `None` (logged), never aborting the run.
pub fn resolve_option(field: &str, options: &FieldOptions, pool: &DataPool) -> Option<FieldValue> {
    if options.depends_on.is_some() {
        return resolve_dependency(field, options, pool);
    }

    match &options.source {
        Some(OptionSource::List(values)) => random::random_element(values, None).cloned(),
        Some(OptionSource::Derive(_)) => {
            warn!("derive option configured without a dependency accessor for field '{field}'");
            None
        }
        None => None,
    }
}

fn resolve_dependency(field: &str, options: &FieldOptions, pool: &DataPool) -> Option<FieldValue> {
    let accessor = options.depends_on.as_ref()?;
    let dependency = accessor(pool);

    match &options.source {
        Some(OptionSource::Derive(derive)) if !dependency.is_empty() => derive(&dependency),
        _ => {
            warn!(
                "dependency for field '{field}' is unresolvable: \
                 accessor returned empty data or the option is not derivable"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docseed_core::{DependencyValue, Record};

    fn pool_with_users(count: usize) -> DataPool {
        let mut pool = DataPool::new();
        let records: Vec<Record> = (0..count)
            .map(|i| {
                let mut record = Record::new();
                record.insert("rank".to_string(), FieldValue::Int(i as i64));
                record
            })
            .collect();
        pool.insert("users", records);
        pool
    }

    #[test]
    fn test_static_list_membership() {
        let options = FieldOptions::new().with_options(["red", "green", "blue"]);
        let pool = DataPool::new();

        for _ in 0..50 {
            let value = resolve_option("color", &options, &pool).unwrap();
            let s = value.as_str().unwrap();
            assert!(["red", "green", "blue"].contains(&s));
        }
    }

    #[test]
    fn test_empty_list_yields_unset() {
        let options = FieldOptions::new().with_options(Vec::<FieldValue>::new());
        assert!(resolve_option("color", &options, &DataPool::new()).is_none());
    }

    #[test]
    fn test_no_source_yields_unset() {
        let options = FieldOptions::new();
        assert!(resolve_option("color", &options, &DataPool::new()).is_none());
    }

    #[test]
    fn test_dependency_draws_from_collection() {
        let options = FieldOptions::new()
            .with_depends_on(|pool| pool.dependency("users"))
            .with_derive(|dependency| {
                let records = dependency.records()?;
                let picked = random::random_element(records, None)?;
                picked.get("rank").cloned()
            });
        let pool = pool_with_users(5);

        for _ in 0..50 {
            let value = resolve_option("owner", &options, &pool).unwrap();
            let rank = value.as_i64().unwrap();
            assert!((0..5).contains(&rank));
        }
    }

    #[test]
    fn test_empty_dependency_yields_unset() {
        let options = FieldOptions::new()
            .with_depends_on(|pool| pool.dependency("users"))
            .with_derive(|_| Some(FieldValue::Int(1)));

        // No users generated yet: the forward reference degrades to unset
        assert!(resolve_option("owner", &options, &DataPool::new()).is_none());
    }

    #[test]
    fn test_dependency_without_derivable_option_yields_unset() {
        // Dependency present but the option is a static list, not a function
        let options = FieldOptions::new()
            .with_depends_on(|pool| pool.dependency("users"))
            .with_options([1i64, 2]);

        assert!(resolve_option("owner", &options, &pool_with_users(3)).is_none());
    }

    #[test]
    fn test_derive_without_accessor_yields_unset() {
        let options = FieldOptions::new().with_derive(|_| Some(FieldValue::Int(1)));
        assert!(resolve_option("owner", &options, &DataPool::new()).is_none());
    }

    #[test]
    fn test_scalar_dependency_value() {
        let options = FieldOptions::new()
            .with_depends_on(|_| DependencyValue::Value(FieldValue::Int(41)))
            .with_derive(|dependency| match dependency {
                DependencyValue::Value(FieldValue::Int(n)) => Some(FieldValue::Int(n + 1)),
                _ => None,
            });

        let value = resolve_option("next", &options, &DataPool::new()).unwrap();
        assert_eq!(value, FieldValue::Int(42));
    }
}
