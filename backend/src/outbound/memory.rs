//! In-memory implementation of every driven port.
//!
//! Mirrors the PostgreSQL schema's unique constraints, foreign keys and
//! cascades so handler and service tests observe the same failures as the
//! Diesel adapters. State lives behind a single mutex; every operation is
//! atomic with respect to the others.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    IngredientRepository, RecipeCollection, RecipeCollectionRepository, RecipeRepository,
    Repositories, RepositoryError, SubscriptionRepository, TagRepository, UserRepository,
    constraints,
};
use crate::domain::{
    CartIngredientLine, CookingTime, Email, Ingredient, IngredientAmount, IngredientFilter,
    IngredientId, NewRecipe, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipeIngredient,
    RecipeSummary, Subscription, Tag, TagId, User, UserId,
};

#[derive(Debug, Clone)]
struct StoredRecipe {
    id: RecipeId,
    author_id: UserId,
    name: String,
    text: String,
    image: Option<String>,
    cooking_time: CookingTime,
    pub_date: DateTime<Utc>,
    tag_ids: Vec<TagId>,
    ingredients: Vec<IngredientAmount>,
    /// Insertion counter breaking `pub_date` ties.
    seq: u64,
}

impl StoredRecipe {
    fn overwrite(&mut self, draft: &RecipeDraft) {
        self.name = draft.name().to_owned();
        self.text = draft.text().to_owned();
        self.image = draft.image().map(str::to_owned);
        self.cooking_time = draft.cooking_time();
        self.tag_ids = draft.tag_ids().to_vec();
        self.ingredients = draft.ingredients().to_vec();
    }
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, User>,
    tags: HashMap<TagId, Tag>,
    ingredients: HashMap<IngredientId, Ingredient>,
    recipes: HashMap<RecipeId, StoredRecipe>,
    favorites: Vec<(UserId, RecipeId)>,
    cart: Vec<(UserId, RecipeId)>,
    subscriptions: Vec<Subscription>,
    next_seq: u64,
}

impl State {
    const fn entries(&self, collection: RecipeCollection) -> &Vec<(UserId, RecipeId)> {
        match collection {
            RecipeCollection::Favorites => &self.favorites,
            RecipeCollection::ShoppingCart => &self.cart,
        }
    }

    const fn entries_mut(&mut self, collection: RecipeCollection) -> &mut Vec<(UserId, RecipeId)> {
        match collection {
            RecipeCollection::Favorites => &mut self.favorites,
            RecipeCollection::ShoppingCart => &mut self.cart,
        }
    }

    fn user_conflict(&self, user: &User) -> Option<&'static str> {
        let others = self.users.values().filter(|other| other.id != user.id);
        for other in others {
            if other.email == user.email {
                return Some(constraints::USERS_EMAIL);
            }
            if other.username == user.username {
                return Some(constraints::USERS_USERNAME);
            }
        }
        None
    }

    fn tag_conflict(&self, tag: &Tag) -> Option<&'static str> {
        let others = self.tags.values().filter(|other| other.id != tag.id);
        for other in others {
            if other.name == tag.name {
                return Some(constraints::TAGS_NAME);
            }
            if other.color == tag.color {
                return Some(constraints::TAGS_COLOR);
            }
            if other.slug == tag.slug {
                return Some(constraints::TAGS_SLUG);
            }
        }
        None
    }

    fn ingredient_conflict(&self, ingredient: &Ingredient) -> Option<&'static str> {
        self.ingredients
            .values()
            .any(|other| other.id != ingredient.id && other.name == ingredient.name)
            .then_some(constraints::INGREDIENTS_NAME)
    }

    fn check_recipe_references(&self, draft: &RecipeDraft) -> Result<(), RepositoryError> {
        if draft.tag_ids().iter().any(|id| !self.tags.contains_key(id)) {
            return Err(RepositoryError::missing_reference(
                constraints::RECIPE_TAGS_TAG_FK,
            ));
        }
        if draft
            .ingredients()
            .iter()
            .any(|row| !self.ingredients.contains_key(&row.ingredient_id))
        {
            return Err(RepositoryError::missing_reference(
                constraints::RECIPE_INGREDIENTS_INGREDIENT_FK,
            ));
        }
        Ok(())
    }

    fn hydrate(&self, stored: &StoredRecipe) -> Recipe {
        let mut tags: Vec<Tag> = stored
            .tag_ids
            .iter()
            .filter_map(|id| self.tags.get(id).cloned())
            .collect();
        tags.sort_by(|a, b| a.slug.cmp(&b.slug));
        let mut ingredients: Vec<RecipeIngredient> = stored
            .ingredients
            .iter()
            .filter_map(|row| {
                self.ingredients
                    .get(&row.ingredient_id)
                    .map(|ingredient| RecipeIngredient {
                        id: ingredient.id,
                        name: ingredient.name.clone(),
                        measurement_unit: ingredient.measurement_unit.clone(),
                        amount: row.amount,
                    })
            })
            .collect();
        ingredients.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Recipe {
            id: stored.id,
            author_id: stored.author_id,
            name: stored.name.clone(),
            text: stored.text.clone(),
            image: stored.image.clone(),
            cooking_time: stored.cooking_time,
            pub_date: stored.pub_date,
            tags,
            ingredients,
        }
    }

    /// Recipes newest first.
    fn newest_first<'a>(&'a self, keep: impl Fn(&StoredRecipe) -> bool) -> Vec<&'a StoredRecipe> {
        let mut recipes: Vec<&StoredRecipe> =
            self.recipes.values().filter(|recipe| keep(recipe)).collect();
        recipes.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.seq.cmp(&a.seq)));
        recipes
    }

    fn remove_recipe(&mut self, id: &RecipeId) -> bool {
        let removed = self.recipes.remove(id).is_some();
        if removed {
            self.favorites.retain(|(_, recipe)| recipe != id);
            self.cart.retain(|(_, recipe)| recipe != id);
        }
        removed
    }
}

/// Thread-safe in-memory store implementing every repository port.
///
/// # Examples
/// ```
/// use foodgram::outbound::memory::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// let repositories = store.repositories();
/// # let _ = repositories;
/// ```
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle this store behind every port.
    #[must_use]
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(self.clone()),
            tags: Arc::new(self.clone()),
            ingredients: Arc::new(self.clone()),
            recipes: Arc::new(self.clone()),
            collections: Arc::new(self.clone()),
            subscriptions: Arc::new(self.clone()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::query("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        if let Some(constraint) = state.user_conflict(user) {
            return Err(RepositoryError::unique_violation(constraint));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock()?.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, RepositoryError> {
        let state = self.lock()?;
        let mut users: Vec<User> = ids
            .iter()
            .filter_map(|id| state.users.get(id).cloned())
            .collect();
        users.sort_by(|a, b| a.username.as_str().cmp(b.username.as_str()));
        users.dedup_by_key(|user| user.id);
        Ok(users)
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let mut users: Vec<User> = self.lock()?.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.as_str().cmp(b.username.as_str()));
        Ok(users)
    }

    async fn update(&self, user: &User) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        if !state.users.contains_key(&user.id) {
            return Ok(false);
        }
        if let Some(constraint) = state.user_conflict(user) {
            return Err(RepositoryError::unique_violation(constraint));
        }
        state.users.insert(user.id, user.clone());
        Ok(true)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        if state.users.remove(id).is_none() {
            return Ok(false);
        }
        let authored: Vec<RecipeId> = state
            .recipes
            .values()
            .filter(|recipe| &recipe.author_id == id)
            .map(|recipe| recipe.id)
            .collect();
        for recipe in &authored {
            state.remove_recipe(recipe);
        }
        state.favorites.retain(|(user, _)| user != id);
        state.cart.retain(|(user, _)| user != id);
        state
            .subscriptions
            .retain(|sub| sub.follower() != id && sub.author() != id);
        Ok(true)
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn create(&self, tag: &Tag) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        if let Some(constraint) = state.tag_conflict(tag) {
            return Err(RepositoryError::unique_violation(constraint));
        }
        state.tags.insert(tag.id, tag.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TagId) -> Result<Option<Tag>, RepositoryError> {
        Ok(self.lock()?.tags.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, RepositoryError> {
        let state = self.lock()?;
        let mut tags: Vec<Tag> = ids
            .iter()
            .filter_map(|id| state.tags.get(id).cloned())
            .collect();
        tags.sort_by(|a, b| a.slug.cmp(&b.slug));
        tags.dedup_by_key(|tag| tag.id);
        Ok(tags)
    }

    async fn list(&self) -> Result<Vec<Tag>, RepositoryError> {
        let mut tags: Vec<Tag> = self.lock()?.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(tags)
    }

    async fn update(&self, tag: &Tag) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        if !state.tags.contains_key(&tag.id) {
            return Ok(false);
        }
        if let Some(constraint) = state.tag_conflict(tag) {
            return Err(RepositoryError::unique_violation(constraint));
        }
        state.tags.insert(tag.id, tag.clone());
        Ok(true)
    }

    async fn delete(&self, id: &TagId) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        if state.tags.remove(id).is_none() {
            return Ok(false);
        }
        for recipe in state.recipes.values_mut() {
            recipe.tag_ids.retain(|tag| tag != id);
        }
        Ok(true)
    }
}

#[async_trait]
impl IngredientRepository for InMemoryStore {
    async fn create(&self, ingredient: &Ingredient) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        if let Some(constraint) = state.ingredient_conflict(ingredient) {
            return Err(RepositoryError::unique_violation(constraint));
        }
        state.ingredients.insert(ingredient.id, ingredient.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &IngredientId) -> Result<Option<Ingredient>, RepositoryError> {
        Ok(self.lock()?.ingredients.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[IngredientId]) -> Result<Vec<Ingredient>, RepositoryError> {
        let state = self.lock()?;
        let mut ingredients: Vec<Ingredient> = ids
            .iter()
            .filter_map(|id| state.ingredients.get(id).cloned())
            .collect();
        ingredients.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        ingredients.dedup_by_key(|ingredient| ingredient.id);
        Ok(ingredients)
    }

    async fn list(&self, filter: &IngredientFilter) -> Result<Vec<Ingredient>, RepositoryError> {
        let mut ingredients: Vec<Ingredient> = self
            .lock()?
            .ingredients
            .values()
            .filter(|ingredient| filter.matches(ingredient))
            .cloned()
            .collect();
        ingredients.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(ingredients)
    }

    async fn update(&self, ingredient: &Ingredient) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        if !state.ingredients.contains_key(&ingredient.id) {
            return Ok(false);
        }
        if let Some(constraint) = state.ingredient_conflict(ingredient) {
            return Err(RepositoryError::unique_violation(constraint));
        }
        state.ingredients.insert(ingredient.id, ingredient.clone());
        Ok(true)
    }

    async fn delete(&self, id: &IngredientId) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        if state.ingredients.remove(id).is_none() {
            return Ok(false);
        }
        for recipe in state.recipes.values_mut() {
            recipe.ingredients.retain(|row| &row.ingredient_id != id);
        }
        Ok(true)
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn create(&self, recipe: &NewRecipe) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        if !state.users.contains_key(&recipe.author_id) {
            return Err(RepositoryError::missing_reference(
                constraints::RECIPES_AUTHOR_FK,
            ));
        }
        state.check_recipe_references(&recipe.draft)?;
        let seq = state.next_seq;
        state.next_seq += 1;
        let mut stored = StoredRecipe {
            id: recipe.id,
            author_id: recipe.author_id,
            name: String::new(),
            text: String::new(),
            image: None,
            cooking_time: recipe.draft.cooking_time(),
            pub_date: recipe.pub_date,
            tag_ids: Vec::new(),
            ingredients: Vec::new(),
            seq,
        };
        stored.overwrite(&recipe.draft);
        state.recipes.insert(recipe.id, stored);
        Ok(())
    }

    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.recipes.get(id).map(|stored| state.hydrate(stored)))
    }

    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, RepositoryError> {
        let state = self.lock()?;
        let tag_ids: Vec<TagId> = state
            .tags
            .values()
            .filter(|tag| filter.tag_slugs.contains(&tag.slug))
            .map(|tag| tag.id)
            .collect();
        let in_collection = |collection: RecipeCollection, user: &Option<UserId>, recipe: &RecipeId| {
            user.as_ref().is_none_or(|user| {
                state
                    .entries(collection)
                    .iter()
                    .any(|(owner, id)| owner == user && id == recipe)
            })
        };
        let recipes = state.newest_first(|recipe| {
            filter
                .author
                .as_ref()
                .is_none_or(|author| &recipe.author_id == author)
                && (filter.tag_slugs.is_empty()
                    || recipe.tag_ids.iter().any(|id| tag_ids.contains(id)))
                && in_collection(RecipeCollection::Favorites, &filter.favorited_by, &recipe.id)
                && in_collection(RecipeCollection::ShoppingCart, &filter.in_cart_of, &recipe.id)
        });
        Ok(recipes
            .into_iter()
            .map(|stored| state.hydrate(stored))
            .collect())
    }

    async fn replace(&self, id: &RecipeId, draft: &RecipeDraft) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        if !state.recipes.contains_key(id) {
            return Ok(false);
        }
        state.check_recipe_references(draft)?;
        if let Some(stored) = state.recipes.get_mut(id) {
            stored.overwrite(draft);
        }
        Ok(true)
    }

    async fn delete(&self, id: &RecipeId) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.remove_recipe(id))
    }

    async fn summaries_by_author(
        &self,
        author: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<RecipeSummary>, RepositoryError> {
        let state = self.lock()?;
        let recipes = state.newest_first(|recipe| &recipe.author_id == author);
        Ok(recipes
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|stored| RecipeSummary {
                id: stored.id,
                name: stored.name.clone(),
                image: stored.image.clone(),
                cooking_time: stored.cooking_time,
            })
            .collect())
    }

    async fn count_by_author(&self, author: &UserId) -> Result<u64, RepositoryError> {
        let state = self.lock()?;
        let count = state
            .recipes
            .values()
            .filter(|recipe| &recipe.author_id == author)
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl RecipeCollectionRepository for InMemoryStore {
    async fn add(
        &self,
        collection: RecipeCollection,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        if !state.recipes.contains_key(recipe) {
            let constraint = match collection {
                RecipeCollection::Favorites => constraints::FAVORITES_RECIPE_FK,
                RecipeCollection::ShoppingCart => constraints::SHOPPING_CART_RECIPE_FK,
            };
            return Err(RepositoryError::missing_reference(constraint));
        }
        let entry = (*user, *recipe);
        if state.entries(collection).contains(&entry) {
            let constraint = match collection {
                RecipeCollection::Favorites => constraints::FAVORITES_USER_RECIPE,
                RecipeCollection::ShoppingCart => constraints::SHOPPING_CART_USER_RECIPE,
            };
            return Err(RepositoryError::unique_violation(constraint));
        }
        state.entries_mut(collection).push(entry);
        Ok(())
    }

    async fn remove(
        &self,
        collection: RecipeCollection,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        let entries = state.entries_mut(collection);
        let before = entries.len();
        entries.retain(|(owner, id)| !(owner == user && id == recipe));
        Ok(entries.len() != before)
    }

    async fn recipe_ids(
        &self,
        collection: RecipeCollection,
        user: &UserId,
    ) -> Result<Vec<RecipeId>, RepositoryError> {
        Ok(self
            .lock()?
            .entries(collection)
            .iter()
            .filter(|(owner, _)| owner == user)
            .map(|(_, recipe)| *recipe)
            .collect())
    }

    async fn cart_ingredient_lines(
        &self,
        user: &UserId,
    ) -> Result<Vec<CartIngredientLine>, RepositoryError> {
        let state = self.lock()?;
        let lines = state
            .cart
            .iter()
            .filter(|(owner, _)| owner == user)
            .filter_map(|(_, recipe)| state.recipes.get(recipe))
            .flat_map(|recipe| recipe.ingredients.iter())
            .filter_map(|row| {
                state.ingredients.get(&row.ingredient_id).map(|ingredient| {
                    CartIngredientLine::new(
                        ingredient.name.as_str(),
                        ingredient.measurement_unit.as_str(),
                        u64::from(row.amount.value()),
                    )
                })
            })
            .collect();
        Ok(lines)
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn create(&self, subscription: &Subscription) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        if !state.users.contains_key(subscription.author()) {
            return Err(RepositoryError::missing_reference(
                constraints::SUBSCRIPTIONS_AUTHOR_FK,
            ));
        }
        let exists = state.subscriptions.iter().any(|existing| {
            existing.follower() == subscription.follower()
                && existing.author() == subscription.author()
        });
        if exists {
            return Err(RepositoryError::unique_violation(
                constraints::SUBSCRIPTIONS_FOLLOWER_AUTHOR,
            ));
        }
        state.subscriptions.push(subscription.clone());
        Ok(())
    }

    async fn delete(&self, follower: &UserId, author: &UserId) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        let before = state.subscriptions.len();
        state
            .subscriptions
            .retain(|sub| !(sub.follower() == follower && sub.author() == author));
        Ok(state.subscriptions.len() != before)
    }

    async fn author_ids(&self, follower: &UserId) -> Result<Vec<UserId>, RepositoryError> {
        let state = self.lock()?;
        let mut subscriptions: Vec<&Subscription> = state
            .subscriptions
            .iter()
            .filter(|sub| sub.follower() == follower)
            .collect();
        subscriptions.sort_by_key(|sub| sub.date_added());
        Ok(subscriptions.into_iter().map(|sub| *sub.author()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        IngredientDraft, RecipeDraftParts, ShoppingList, TagDraft, UserRegistration,
    };
    use rstest::{fixture, rstest};

    struct Seeded {
        store: InMemoryStore,
        author: User,
        tag: Tag,
        flour: Ingredient,
        sugar: Ingredient,
    }

    fn user(name: &str) -> User {
        let registration =
            UserRegistration::try_from_parts(&format!("{name}@example.com"), name, "A", "B")
                .expect("registration");
        User::register(UserId::random(), registration)
    }

    #[fixture]
    async fn seeded() -> Seeded {
        let store = InMemoryStore::new();
        let author = user("author");
        UserRepository::create(&store, &author).await.expect("user");
        let tag = Tag::new(
            TagId::random(),
            TagDraft::try_from_parts("Dessert", "#AA00AA", "dessert").expect("tag"),
        );
        TagRepository::create(&store, &tag).await.expect("tag");
        let flour = Ingredient::new(
            IngredientId::random(),
            IngredientDraft::try_from_parts("Flour", "g").expect("flour"),
        );
        let sugar = Ingredient::new(
            IngredientId::random(),
            IngredientDraft::try_from_parts("Sugar", "g").expect("sugar"),
        );
        IngredientRepository::create(&store, &flour)
            .await
            .expect("flour");
        IngredientRepository::create(&store, &sugar)
            .await
            .expect("sugar");
        Seeded {
            store,
            author,
            tag,
            flour,
            sugar,
        }
    }

    async fn add_recipe(seeded: &Seeded, lines: Vec<(IngredientId, u32)>) -> RecipeId {
        let draft = RecipeDraft::try_new(RecipeDraftParts {
            name: "Cake".to_owned(),
            text: "Bake it.".to_owned(),
            image: None,
            cooking_time: 40,
            tag_ids: vec![seeded.tag.id],
            ingredients: lines,
        })
        .expect("draft");
        let recipe = NewRecipe {
            id: RecipeId::random(),
            author_id: seeded.author.id,
            pub_date: Utc::now(),
            draft,
        };
        RecipeRepository::create(&seeded.store, &recipe)
            .await
            .expect("recipe");
        recipe.id
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_favorite_violates_unique_constraint(#[future] seeded: Seeded) {
        let seeded = seeded.await;
        let recipe = add_recipe(&seeded, vec![(seeded.flour.id, 100)]).await;
        let reader = seeded.author.id;

        seeded
            .store
            .add(RecipeCollection::Favorites, &reader, &recipe)
            .await
            .expect("first favourite");
        let err = seeded
            .store
            .add(RecipeCollection::Favorites, &reader, &recipe)
            .await
            .expect_err("second favourite");

        assert_eq!(err.constraint(), Some(constraints::FAVORITES_USER_RECIPE));
        let ids = seeded
            .store
            .recipe_ids(RecipeCollection::Favorites, &reader)
            .await
            .expect("ids");
        assert_eq!(ids, vec![recipe]);
    }

    #[rstest]
    #[tokio::test]
    async fn cart_lines_feed_the_shopping_list(#[future] seeded: Seeded) {
        let seeded = seeded.await;
        let first = add_recipe(
            &seeded,
            vec![(seeded.flour.id, 200), (seeded.sugar.id, 50)],
        )
        .await;
        let second = add_recipe(&seeded, vec![(seeded.flour.id, 100)]).await;
        let shopper = seeded.author.id;
        for recipe in [first, second] {
            seeded
                .store
                .add(RecipeCollection::ShoppingCart, &shopper, &recipe)
                .await
                .expect("cart entry");
        }

        let lines = seeded
            .store
            .cart_ingredient_lines(&shopper)
            .await
            .expect("lines");

        assert_eq!(
            ShoppingList::aggregate(lines).render(),
            "Shopping list:\n- Flour 300 g\n- Sugar 50 g\n"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_recipe_cascades_to_collections(#[future] seeded: Seeded) {
        let seeded = seeded.await;
        let recipe = add_recipe(&seeded, vec![(seeded.flour.id, 100)]).await;
        let shopper = seeded.author.id;
        seeded
            .store
            .add(RecipeCollection::ShoppingCart, &shopper, &recipe)
            .await
            .expect("cart entry");

        assert!(
            RecipeRepository::delete(&seeded.store, &recipe)
                .await
                .expect("delete")
        );

        let lines = seeded
            .store
            .cart_ingredient_lines(&shopper)
            .await
            .expect("lines");
        assert!(lines.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_tag_is_a_missing_reference(#[future] seeded: Seeded) {
        let seeded = seeded.await;
        let draft = RecipeDraft::try_new(RecipeDraftParts {
            name: "Cake".to_owned(),
            text: "Bake it.".to_owned(),
            image: None,
            cooking_time: 40,
            tag_ids: vec![TagId::random()],
            ingredients: vec![(seeded.flour.id, 1)],
        })
        .expect("draft");
        let recipe = NewRecipe {
            id: RecipeId::random(),
            author_id: seeded.author.id,
            pub_date: Utc::now(),
            draft,
        };

        let err = RecipeRepository::create(&seeded.store, &recipe)
            .await
            .expect_err("unknown tag");

        assert_eq!(err.constraint(), Some(constraints::RECIPE_TAGS_TAG_FK));
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_reported() {
        let store = InMemoryStore::new();
        let first = user("same");
        let second = User {
            id: UserId::random(),
            ..first.clone()
        };
        UserRepository::create(&store, &first).await.expect("first");

        let err = UserRepository::create(&store, &second)
            .await
            .expect_err("duplicate");

        assert_eq!(err.constraint(), Some(constraints::USERS_EMAIL));
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_user_removes_their_recipes(#[future] seeded: Seeded) {
        let seeded = seeded.await;
        add_recipe(&seeded, vec![(seeded.flour.id, 100)]).await;

        assert!(
            UserRepository::delete(&seeded.store, &seeded.author.id)
                .await
                .expect("delete")
        );

        let count = seeded
            .store
            .count_by_author(&seeded.author.id)
            .await
            .expect("count");
        assert_eq!(count, 0);
    }
}
