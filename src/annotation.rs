//! The per-location annotation form, modelled as an immutable state value
//! and a pure reducer.
//!
//! The form has a species selector offering the species already seen in
//! the session plus an "enter new species" entry, a text box for that new
//! species (only shown while entering one), and a free-text health field.

use serde::{Deserialize, Serialize};

use crate::location::{Details, Location};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// An existing species (or none) is selected.
    Idle,

    /// The user is typing a new species.
    CustomEntry,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Idle
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Annotation {
    pub mode: Mode,
    pub species: String,
    pub custom_species: String,
    pub health: String,
}

/// A single user interaction with the form.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    SelectSpecies { species: String },
    EnterNewSpecies,
    TypeCustomSpecies { text: String },
    TypeHealth { text: String },
}

impl Annotation {
    /// The form as first shown for `location`.
    pub fn for_location(location: &Location) -> Self {
        Annotation {
            mode: Mode::Idle,
            species: location.species().unwrap_or_default().to_owned(),
            custom_species: String::new(),
            health: location.health().unwrap_or_default().to_owned(),
        }
    }

    /// What saving the form would record.
    pub fn details(&self) -> Details {
        Details::from_text(&self.species, &self.health)
    }
}

/// Applies `action` to `state`, returning the next state.
pub fn reduce(state: &Annotation, action: Action) -> Annotation {
    match action {
        Action::SelectSpecies { species } => Annotation {
            mode: Mode::Idle,
            species,
            custom_species: String::new(),
            ..state.clone()
        },
        Action::EnterNewSpecies => Annotation {
            mode: Mode::CustomEntry,
            species: String::new(),
            custom_species: String::new(),
            ..state.clone()
        },
        // the text box only exists while entering a new species
        Action::TypeCustomSpecies { text } => match state.mode {
            Mode::CustomEntry => Annotation {
                species: text.clone(),
                custom_species: text,
                ..state.clone()
            },
            Mode::Idle => state.clone(),
        },
        Action::TypeHealth { text } => Annotation {
            health: text,
            ..state.clone()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{reduce, Action, Annotation, Mode};
    use crate::location::{Coords, Details, Location};

    fn typed(text: &str) -> Action {
        Action::TypeCustomSpecies {
            text: text.to_owned(),
        }
    }

    #[test]
    fn entering_a_new_species_mirrors_every_keystroke() {
        let state = reduce(&Annotation::default(), Action::EnterNewSpecies);
        assert_eq!(state.mode, Mode::CustomEntry);

        let state = ["H", "He", "Her", "Hero", "Heron"]
            .iter()
            .fold(state, |state, text| {
                let next = reduce(&state, typed(text));
                assert_eq!(next.species, *text);
                next
            });

        assert_eq!(state.species, "Heron");
        assert_eq!(state.custom_species, "Heron");
    }

    #[test]
    fn selecting_an_existing_species_discards_typed_text() {
        let state = reduce(&Annotation::default(), Action::EnterNewSpecies);
        let state = reduce(&state, typed("Heron"));
        let state = reduce(
            &state,
            Action::SelectSpecies {
                species: "Oak".to_owned(),
            },
        );

        assert_eq!(state.mode, Mode::Idle);
        assert_eq!(state.species, "Oak");
        assert_eq!(state.custom_species, "");
    }

    #[test]
    fn entering_a_new_species_clears_the_selection() {
        let state = reduce(
            &Annotation::default(),
            Action::SelectSpecies {
                species: "Oak".to_owned(),
            },
        );
        let state = reduce(&state, Action::EnterNewSpecies);

        assert_eq!(state.species, "");
        assert_eq!(state.custom_species, "");
    }

    #[test]
    fn typing_a_custom_species_while_idle_is_ignored() {
        let state = reduce(
            &Annotation::default(),
            Action::SelectSpecies {
                species: "Oak".to_owned(),
            },
        );

        assert_eq!(reduce(&state, typed("Heron")), state);
    }

    #[test]
    fn health_is_editable_in_any_mode() {
        let idle = reduce(
            &Annotation::default(),
            Action::TypeHealth {
                text: "Dieback".to_owned(),
            },
        );
        assert_eq!(idle.health, "Dieback");

        let custom = reduce(&idle, Action::EnterNewSpecies);
        let custom = reduce(
            &custom,
            Action::TypeHealth {
                text: "".to_owned(),
            },
        );
        assert_eq!(custom.mode, Mode::CustomEntry);
        assert_eq!(custom.health, "");
    }

    #[test]
    fn forms_start_from_the_recorded_details() {
        let mut location = Location::new(
            "T1".to_owned(),
            0,
            Coords {
                latitude: 0.0,
                longitude: 0.0,
                accuracy: 0.0,
            },
            None,
        );
        location.apply(Details::from_text("Oak", ""));

        let state = Annotation::for_location(&location);

        assert_eq!(state.species, "Oak");
        assert_eq!(state.health, "");
        assert_eq!(state.details(), Details::from_text("Oak", ""));
    }

    #[test]
    fn actions_use_a_tagged_representation() {
        let action: Action = serde_json::from_str(r#"{"action": "type_custom_species", "text": "Heron"}"#)
            .expect("parse action");

        assert_eq!(action, typed("Heron"));

        let action: Action =
            serde_json::from_str(r#"{"action": "enter_new_species"}"#).expect("parse action");

        assert_eq!(action, Action::EnterNewSpecies);
    }
}
