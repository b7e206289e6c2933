pub mod config;
pub mod trace;

/// Declares a plain serde data struct with public fields. `Option` fields
/// default to `None` when absent and are omitted from the output when `None`.
#[macro_export]
macro_rules! serializable_struct {
    ( @ $name:ident { } -> ($($fields:tt)*) ) => (
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
        pub struct $name {
            $($fields)*
        }
    );
    ( @ $name:ident { $(#[$attr:meta])* $param:ident : Option<$type:ty>, $($rest:tt)* } -> ($($fields:tt)*) ) => (
        serializable_struct!(@ $name { $($rest)* } -> (
            $($fields)*
            $(#[$attr])*
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub $param : Option<$type>,
        ));
    );
    ( @ $name:ident { $(#[$attr:meta])* $param:ident : $type:ty, $($rest:tt)* } -> ($($fields:tt)*) ) => (
        serializable_struct!(@ $name { $($rest)* } -> (
            $($fields)*
            $(#[$attr])*
            pub $param : $type,
        ));
    );
    ( $name:ident { $( $rest:tt)* } ) => {
        serializable_struct!(@ $name { $($rest)* } -> ());
    };
}
