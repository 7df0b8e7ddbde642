//! Closed vocabularies stored as their French label.

/// Declares a closed vocabulary stored and sent as its French label.
///
/// The first variant is the form default.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $first:ident => $first_label:literal,
            $($variant:ident => $label:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            #[default]
            #[doc = $first_label]
            #[serde(rename = $first_label)]
            $first,
            $(
                #[doc = $label]
                #[serde(rename = $label)]
                $variant,
            )*
        }

        impl $name {
            /// Every label, in form order.
            pub const ALL: &'static [Self] = &[Self::$first, $(Self::$variant),*];

            /// Label as stored.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    Self::$first => $first_label,
                    $(Self::$variant => $label,)*
                }
            }

            /// Parse a stored label.
            #[must_use]
            pub fn parse(s: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str() == s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use vocabulary;
