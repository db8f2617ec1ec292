//! Per-user session state
//!
//! A [`Session`] owns the signed-in user's profile and saved recipes. State
//! is reloaded whenever the identity changes and written through the
//! persistence port after every mutation. A failed write leaves the
//! in-memory state untouched.

mod identity;
mod persistence;
mod sequence;

pub use identity::{IdentityProvider, StaticIdentity, UserId};
pub use persistence::{MemoryStore, PersistencePort};
pub use sequence::{Delivery, RequestSequencer, Ticket};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::domain::{Meal, Profile, ProfileUpdate};
use crate::error::CoreError;
use crate::recipes::SavedRecipes;

/// Record key of the profile snapshot
pub const PROFILE_KEY: &str = "profile";

/// Record key of the saved-recipes set
pub const RECIPES_KEY: &str = "saved_recipes";

fn persistence_error(e: eyre::Report) -> CoreError {
    CoreError::Persistence(format!("{:#}", e))
}

#[derive(Debug)]
struct ActiveUser {
    id: UserId,
    profile: Option<Profile>,
    recipes: SavedRecipes,
}

/// Profile and saved recipes of the signed-in user
pub struct Session<P: PersistencePort> {
    store: P,
    active: Option<ActiveUser>,
}

impl<P: PersistencePort> Session<P> {
    /// A session with nobody signed in
    pub fn new(store: P) -> Self {
        Self { store, active: None }
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn user(&self) -> Option<&UserId> {
        self.active.as_ref().map(|a| &a.id)
    }

    /// The user's saved profile, if one was ever saved
    pub fn profile(&self) -> Option<&Profile> {
        self.active.as_ref().and_then(|a| a.profile.as_ref())
    }

    pub fn recipes(&self) -> Result<&SavedRecipes, CoreError> {
        Ok(&self.active()?.recipes)
    }

    fn active(&self) -> Result<&ActiveUser, CoreError> {
        self.active.as_ref().ok_or(CoreError::NoActiveUser)
    }

    fn active_mut(&mut self) -> Result<&mut ActiveUser, CoreError> {
        self.active.as_mut().ok_or(CoreError::NoActiveUser)
    }

    fn load_json<T: DeserializeOwned>(&self, user: &UserId, key: &str) -> Result<Option<T>, CoreError> {
        match self.store.load(user, key).map_err(persistence_error)? {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| CoreError::Persistence(format!("Corrupt {} record for {}: {}", key, user, e))),
            None => Ok(None),
        }
    }

    fn save_json<T: Serialize>(&self, user: &UserId, key: &str, value: &T) -> Result<(), CoreError> {
        let text = serde_json::to_string_pretty(value).map_err(|e| CoreError::Persistence(e.to_string()))?;
        self.store.save(user, key, &text).map_err(persistence_error)
    }

    /// Make `user` the active user, loading their state
    ///
    /// Switching to the already active user keeps the in-memory state. On
    /// first sign-in an empty recipe set is created and persisted. If any
    /// load fails the previous user stays active.
    pub fn switch_user(&mut self, user: UserId) -> Result<(), CoreError> {
        if self.user() == Some(&user) {
            debug!(%user, "Session::switch_user: already active");
            return Ok(());
        }
        debug!(%user, "Session::switch_user: called");

        let profile: Option<Profile> = self.load_json(&user, PROFILE_KEY)?;
        let recipes = match self.load_json::<SavedRecipes>(&user, RECIPES_KEY)? {
            Some(recipes) => recipes,
            None => {
                info!(%user, "First sign-in, creating empty saved recipes");
                let recipes = SavedRecipes::new();
                self.save_json(&user, RECIPES_KEY, &recipes)?;
                recipes
            }
        };

        info!(%user, has_profile = profile.is_some(), recipes = recipes.len(), "Session user loaded");
        self.active = Some(ActiveUser {
            id: user,
            profile,
            recipes,
        });
        Ok(())
    }

    /// Follow the identity provider; returns whether the active user changed
    pub fn sync_identity(&mut self, identity: &dyn IdentityProvider) -> Result<bool, CoreError> {
        let current = identity.current_user();
        if current.as_ref() == self.user() {
            return Ok(false);
        }
        match current {
            Some(user) => self.switch_user(user)?,
            None => self.sign_out(),
        }
        Ok(true)
    }

    /// Drop the active user's state from memory
    pub fn sign_out(&mut self) {
        if let Some(active) = self.active.take() {
            info!(user = %active.id, "Session signed out");
        }
    }

    /// Replace the stored profile
    pub fn save_profile(&mut self, profile: Profile) -> Result<&Profile, CoreError> {
        profile.validate()?;
        let user = self.active()?.id.clone();
        self.save_json(&user, PROFILE_KEY, &profile)?;
        info!(%user, "Profile saved");

        let active = self.active_mut()?;
        Ok(active.profile.insert(profile))
    }

    /// Apply a single-field update to the stored profile
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<&Profile, CoreError> {
        let active = self.active()?;
        let mut profile = active
            .profile
            .clone()
            .ok_or_else(|| CoreError::InvalidProfile(format!("no profile saved for {}", active.id)))?;
        profile.apply(update)?;
        self.save_profile(profile)
    }

    /// Save a meal; returns false if its dish name was already saved
    pub fn add_recipe(&mut self, meal: Meal) -> Result<bool, CoreError> {
        let active = self.active()?;
        let mut recipes = active.recipes.clone();
        if !recipes.add(meal) {
            return Ok(false);
        }
        self.commit_recipes(recipes)?;
        Ok(true)
    }

    /// Remove a saved meal; returns false if nothing matched
    pub fn remove_recipe(&mut self, dish_name: &str) -> Result<bool, CoreError> {
        let active = self.active()?;
        let mut recipes = active.recipes.clone();
        if !recipes.remove(dish_name) {
            return Ok(false);
        }
        self.commit_recipes(recipes)?;
        Ok(true)
    }

    fn commit_recipes(&mut self, recipes: SavedRecipes) -> Result<(), CoreError> {
        let user = self.active()?.id.clone();
        self.save_json(&user, RECIPES_KEY, &recipes)?;
        debug!(%user, count = recipes.len(), "Session::commit_recipes: persisted");
        self.active_mut()?.recipes = recipes;
        Ok(())
    }
}
