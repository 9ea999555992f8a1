//! Tests for the recipe service using mocked ports.

use super::*;
use crate::domain::ports::{
    MockIngredientRepository, MockRecipeCollectionRepository, MockRecipeRepository,
    MockSubscriptionRepository, MockTagRepository, MockUserRepository, RepositoryError,
    constraints,
};
use crate::domain::{
    Amount, CartIngredientLine, CookingTime, ErrorCode, Ingredient, IngredientDraft,
    IngredientId, RecipeDraftParts, RecipeIngredient, Tag, TagDraft, TagId, UserRegistration,
};
use rstest::{fixture, rstest};

struct Ports {
    recipes: MockRecipeRepository,
    tags: MockTagRepository,
    ingredients: MockIngredientRepository,
    users: MockUserRepository,
    collections: MockRecipeCollectionRepository,
    subscriptions: MockSubscriptionRepository,
}

impl Ports {
    fn into_service(self) -> RecipeService {
        RecipeService::from_repositories(&Repositories {
            users: Arc::new(self.users),
            tags: Arc::new(self.tags),
            ingredients: Arc::new(self.ingredients),
            recipes: Arc::new(self.recipes),
            collections: Arc::new(self.collections),
            subscriptions: Arc::new(self.subscriptions),
        })
    }
}

#[fixture]
fn ports() -> Ports {
    Ports {
        recipes: MockRecipeRepository::new(),
        tags: MockTagRepository::new(),
        ingredients: MockIngredientRepository::new(),
        users: MockUserRepository::new(),
        collections: MockRecipeCollectionRepository::new(),
        subscriptions: MockSubscriptionRepository::new(),
    }
}

fn author() -> User {
    let registration =
        UserRegistration::try_from_parts("chef@example.com", "chef", "Julia", "Child")
            .expect("valid registration");
    User::register(UserId::random(), registration)
}

fn tag() -> Tag {
    Tag::new(
        TagId::random(),
        TagDraft::try_from_parts("Breakfast", "#E26C2D", "breakfast").expect("tag draft"),
    )
}

fn ingredient() -> Ingredient {
    Ingredient::new(
        IngredientId::random(),
        IngredientDraft::try_from_parts("Flour", "g").expect("ingredient draft"),
    )
}

fn recipe(author_id: UserId) -> Recipe {
    let flour = ingredient();
    Recipe {
        id: RecipeId::random(),
        author_id,
        name: "Pancakes".to_owned(),
        text: "Mix and fry.".to_owned(),
        image: None,
        cooking_time: CookingTime::new(15).expect("cooking time"),
        pub_date: Utc::now(),
        tags: vec![tag()],
        ingredients: vec![RecipeIngredient {
            id: flour.id,
            name: flour.name,
            measurement_unit: flour.measurement_unit,
            amount: Amount::new(200).expect("amount"),
        }],
    }
}

fn draft(tag_id: TagId, ingredient_id: IngredientId) -> RecipeDraft {
    RecipeDraft::try_new(RecipeDraftParts {
        name: "Pancakes".to_owned(),
        text: "Mix and fry.".to_owned(),
        image: None,
        cooking_time: 15,
        tag_ids: vec![tag_id],
        ingredients: vec![(ingredient_id, 200)],
    })
    .expect("valid draft")
}

#[rstest]
#[tokio::test]
async fn second_favorite_is_conflict(mut ports: Ports) {
    let stored = recipe(UserId::random());
    let recipe_id = stored.id;
    ports
        .recipes
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    ports.collections.expect_add().return_once(|_, _, _| {
        Err(RepositoryError::unique_violation(
            constraints::FAVORITES_USER_RECIPE,
        ))
    });

    let err = ports
        .into_service()
        .add_to(RecipeCollection::Favorites, &UserId::random(), &recipe_id)
        .await
        .expect_err("duplicate favourite");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn adding_missing_recipe_is_not_found(mut ports: Ports) {
    ports.recipes.expect_find_by_id().return_once(|_| Ok(None));
    ports.collections.expect_add().times(0);

    let err = ports
        .into_service()
        .add_to(
            RecipeCollection::ShoppingCart,
            &UserId::random(),
            &RecipeId::random(),
        )
        .await
        .expect_err("missing recipe");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn removing_absent_entry_is_not_found(mut ports: Ports) {
    ports
        .collections
        .expect_remove()
        .return_once(|_, _, _| Ok(false));

    let err = ports
        .into_service()
        .remove_from(
            RecipeCollection::Favorites,
            &UserId::random(),
            &RecipeId::random(),
        )
        .await
        .expect_err("nothing to remove");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn non_author_cannot_delete(mut ports: Ports) {
    let stored = recipe(UserId::random());
    let recipe_id = stored.id;
    ports
        .recipes
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    ports.recipes.expect_delete().times(0);

    let err = ports
        .into_service()
        .delete(&UserId::random(), &recipe_id)
        .await
        .expect_err("forbidden");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn create_rejects_unknown_ingredient(mut ports: Ports) {
    let known_tag = tag();
    let tag_id = known_tag.id;
    ports
        .tags
        .expect_find_by_ids()
        .return_once(move |_| Ok(vec![known_tag]));
    ports
        .ingredients
        .expect_find_by_ids()
        .return_once(|_| Ok(Vec::new()));
    ports.recipes.expect_create().times(0);

    let err = ports
        .into_service()
        .create(&UserId::random(), draft(tag_id, IngredientId::random()))
        .await
        .expect_err("unknown ingredient");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details()
            .and_then(|details| details.get("field"))
            .and_then(|field| field.as_str()),
        Some("ingredients")
    );
}

#[rstest]
#[tokio::test]
async fn anonymous_favourite_filter_returns_nothing(mut ports: Ports) {
    ports.recipes.expect_list().times(0);
    let query = RecipeListQuery {
        is_favorited: true,
        ..RecipeListQuery::default()
    };

    let views = ports
        .into_service()
        .list(None, query)
        .await
        .expect("empty listing");

    assert!(views.is_empty());
}

#[rstest]
#[tokio::test]
async fn list_annotates_views_for_viewer(mut ports: Ports) {
    let chef = author();
    let chef_id = chef.id;
    let stored = recipe(chef_id);
    let recipe_id = stored.id;
    let viewer = UserId::random();
    ports
        .recipes
        .expect_list()
        .withf(move |filter| filter.favorited_by == Some(viewer) && filter.in_cart_of.is_none())
        .return_once(move |_| Ok(vec![stored]));
    ports
        .users
        .expect_find_by_ids()
        .return_once(move |_| Ok(vec![chef]));
    ports
        .subscriptions
        .expect_author_ids()
        .return_once(move |_| Ok(vec![chef_id]));
    ports
        .collections
        .expect_recipe_ids()
        .returning(move |collection, _| match collection {
            RecipeCollection::Favorites => Ok(vec![recipe_id]),
            RecipeCollection::ShoppingCart => Ok(Vec::new()),
        });

    let views = ports
        .into_service()
        .list(
            Some(&viewer),
            RecipeListQuery {
                is_favorited: true,
                ..RecipeListQuery::default()
            },
        )
        .await
        .expect("listing");

    let [view] = views.as_slice() else {
        panic!("expected one view, got {}", views.len());
    };
    assert!(view.author_is_subscribed);
    assert!(view.is_favorited);
    assert!(!view.is_in_shopping_cart);
}

#[rstest]
#[tokio::test]
async fn shopping_list_sums_cart_lines(mut ports: Ports) {
    ports
        .collections
        .expect_cart_ingredient_lines()
        .return_once(|_| {
            Ok(vec![
                CartIngredientLine::new("Sugar", "g", 50),
                CartIngredientLine::new("Flour", "g", 200),
                CartIngredientLine::new("Flour", "g", 100),
            ])
        });

    let list = ports
        .into_service()
        .shopping_list(&UserId::random())
        .await
        .expect("shopping list");

    assert_eq!(list.render(), "Shopping list:\n- Flour 300 g\n- Sugar 50 g\n");
}

#[rstest]
#[tokio::test]
async fn patch_keeps_unspecified_fields(mut ports: Ports) {
    let caller = UserId::random();
    let chef = User {
        id: caller,
        ..author()
    };
    let stored = recipe(caller);
    let recipe_id = stored.id;
    let tag_ids: Vec<TagId> = stored.tags.iter().map(|tag| tag.id).collect();
    let updated = Recipe {
        cooking_time: CookingTime::new(30).expect("cooking time"),
        ..stored.clone()
    };
    let tags = stored.tags.clone();
    let flour = Ingredient {
        id: stored.ingredients[0].id,
        name: stored.ingredients[0].name.clone(),
        measurement_unit: stored.ingredients[0].measurement_unit.clone(),
    };
    let mut lookups = vec![updated, stored];
    ports
        .recipes
        .expect_find_by_id()
        .times(2)
        .returning(move |_| Ok(lookups.pop()));
    ports.tags.expect_find_by_ids().return_once(move |_| Ok(tags));
    ports
        .ingredients
        .expect_find_by_ids()
        .return_once(move |_| Ok(vec![flour]));
    ports
        .recipes
        .expect_replace()
        .withf(move |_, draft| draft.cooking_time().minutes() == 30 && draft.tag_ids() == tag_ids)
        .return_once(|_, _| Ok(true));
    ports
        .users
        .expect_find_by_ids()
        .return_once(move |_| Ok(vec![chef]));
    ports
        .subscriptions
        .expect_author_ids()
        .return_once(|_| Ok(Vec::new()));
    ports
        .collections
        .expect_recipe_ids()
        .returning(|_, _| Ok(Vec::new()));

    let view = ports
        .into_service()
        .patch(
            &caller,
            &recipe_id,
            RecipePatch {
                cooking_time: Some(30),
                ..RecipePatch::default()
            },
        )
        .await
        .expect("patched");

    assert_eq!(view.recipe.cooking_time.minutes(), 30);
    assert_eq!(view.recipe.name, "Pancakes");
}
