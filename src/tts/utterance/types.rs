use std::fmt::Display;

macro_rules! decl_clamped_float {
    {$(#[$meta:meta])* $name:ident($base:ty) in $min:literal..$max:literal, default $default:literal} => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
        pub struct $name($base);

        impl $name {
            /// The smallest value accepted by the engine.
            pub const MIN: $base = $min;
            /// The largest value accepted by the engine.
            pub const MAX: $base = $max;

            /// Clamps the given value to the interval
            #[doc = concat!("[", stringify!($min), ", ", stringify!($max), "]")]
            /// and constructs a new instance from it. `NaN` maps to the default.
            pub fn new(value: $base) -> Self {
                if value.is_nan() {
                    Self($default)
                } else {
                    Self(value.clamp($min, $max))
                }
            }

            /// Returns the value encapsulated by this instance.
            pub fn value(&self) -> $base {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self($default)
            }
        }

        impl From<$base> for $name {
            fn from(source: $base) -> Self {
                Self::new(source)
            }
        }

        impl From<$name> for $base {
            fn from(source: $name) -> Self {
                source.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.1}", self.0)
            }
        }
    };
}

decl_clamped_float! {
    /// Speech rate, represented as a multiplier in the interval [0.1, 10], with 1 being normal
    /// speed.
    Rate(f32) in 0.1..10.0, default 1.0
}

decl_clamped_float! {
    /// Voice pitch, represented as a value in the interval [0, 2], with 1 being normal pitch.
    Pitch(f32) in 0.0..2.0, default 1.0
}

decl_clamped_float! {
    /// Speech volume, represented as a value in the interval [0, 1], with 1 being full volume.
    Volume(f32) in 0.0..1.0, default 1.0
}
