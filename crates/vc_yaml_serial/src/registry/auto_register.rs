use crate::registry::TypeRegistry;

/// A registration function submitted with [`auto_register!`](crate::auto_register).
///
/// Without the `auto_register` feature the type still exists, but nothing
/// collects it.
pub struct AutoRegistration(pub fn(&mut TypeRegistry));

#[cfg(feature = "auto_register")]
inventory::collect!(AutoRegistration);

// Always submitted, so a registry can tell whether `inventory` works on
// this platform.
#[cfg(feature = "auto_register")]
inventory::submit! {
    AutoRegistration(TypeRegistry::mark_auto_registered)
}

#[cfg(feature = "auto_register")]
pub(super) fn register_all(registry: &mut TypeRegistry) {
    for registration in inventory::iter::<AutoRegistration> {
        (registration.0)(registry);
    }
}

/// Submits a function that registers types, see [`TypeRegistry::auto_register`].
///
/// [`TypeRegistry::auto_register`]: crate::registry::TypeRegistry::auto_register
///
/// The function must be a `fn(&mut TypeRegistry)`. Without the
/// `auto_register` feature the macro expands to nothing.
///
/// # Examples
///
/// ```
/// use vc_yaml_serial::info::{paths, MemberInfo, RecordInfo};
/// use vc_yaml_serial::registry::TypeRegistry;
///
/// fn register_point(registry: &mut TypeRegistry) {
///     registry.register(RecordInfo::new("game::Point", &[
///         MemberInfo::new("x", paths::INT),
///         MemberInfo::new("y", paths::INT),
///     ]));
/// }
///
/// vc_yaml_serial::auto_register!(register_point);
///
/// let mut registry = TypeRegistry::new();
/// if registry.auto_register() {
///     assert!(registry.contains("game::Point"));
/// }
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register {
    ($register:path) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::registry::AutoRegistration($register)
        }
    };
}

/// Submits a function that registers types, see [`TypeRegistry::auto_register`].
///
/// [`TypeRegistry::auto_register`]: crate::registry::TypeRegistry::auto_register
///
/// The `auto_register` feature is disabled, the macro expands to nothing.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! auto_register {
    ($register:path) => {};
}

#[cfg(all(test, feature = "auto_register"))]
mod tests {
    use crate::info::{paths, MemberInfo, RecordInfo};
    use crate::registry::TypeRegistry;

    fn register_test_types(registry: &mut TypeRegistry) {
        registry.register(RecordInfo::new(
            "auto_register_tests::Marker",
            &[MemberInfo::new("id", paths::INT)],
        ));
    }

    crate::auto_register!(register_test_types);

    #[test]
    fn submitted_types_are_registered() {
        let mut registry = TypeRegistry::empty();
        assert!(registry.auto_register());
        assert!(registry.contains("auto_register_tests::Marker"));
        // Second call is a no-op.
        assert!(registry.auto_register());
        assert_eq!(registry.len(), 1);
    }
}
