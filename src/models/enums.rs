use crate::models::ProfileError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ProfileError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ProfileError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
});

str_enum!(ChronicCondition {
    Diabetes => "diabetes",
    Hypertension => "hypertension",
    HeartDisease => "heart_disease",
    KidneyDisease => "kidney_disease",
    Other => "other",
});

str_enum!(HealthGoal {
    WeightLoss => "weight_loss",
    MuscleGain => "muscle_gain",
    GeneralHealth => "general_health",
    Other => "other",
});

str_enum!(ExerciseFrequency {
    Sedentary => "sedentary",
    Light => "light",
    Moderate => "moderate",
    Active => "active",
});

str_enum!(HealthLevel {
    Suitable => "suitable",
    NeedsConsideration => "needs_consideration",
    Limit => "limit",
    Avoid => "avoid",
});
