//! Helper macro for declaring storage port error enums.
//!
//! Generates the enum with `thiserror` display messages plus a snake_case
//! constructor per variant whose parameters accept `impl Into<T>`, so adapters
//! can build errors from string slices and owned values alike.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum ExampleStoreError {
            Offline { message: String } => "store offline: {message}",
            Rejected { slug: String, attempts: u32 } => "rejected {slug} after {attempts} attempts",
            Drained => "store drained",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExampleStoreError::offline("socket closed");
        assert_eq!(err.to_string(), "store offline: socket closed");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ExampleStoreError::rejected("cafe-2", 2_u32);
        assert_eq!(err.to_string(), "rejected cafe-2 after 2 attempts");
    }

    #[test]
    fn unit_variants_get_argument_free_constructors() {
        assert_eq!(ExampleStoreError::drained(), ExampleStoreError::Drained);
    }
}
