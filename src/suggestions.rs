use log::{debug, warn};
use rand::Rng;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::api_connection::connection::ApiConnectionError;
use crate::api_connection::endpoints::{
    ChatCompletionRequest, ChatMessage, JsonSchema, JsonSchemaDefinition, JsonSchemaProperty,
    Provider, ResponseFormat, SUGGESTION_MODEL,
};
use crate::catalog::Recipe;
use crate::profile::UserProfile;

pub const DEFAULT_SUGGESTION_COUNT: usize = 3;

fn string_property(description: &str) -> JsonSchemaProperty {
    JsonSchemaProperty {
        property_type: "string".to_string(),
        description: Some(description.to_string()),
        r#enum: None,
        items: None,
    }
}

fn number_property(description: &str) -> JsonSchemaProperty {
    JsonSchemaProperty {
        property_type: "number".to_string(),
        description: Some(description.to_string()),
        r#enum: None,
        items: None,
    }
}

fn integer_property(description: &str) -> JsonSchemaProperty {
    JsonSchemaProperty {
        property_type: "integer".to_string(),
        description: Some(description.to_string()),
        r#enum: None,
        items: None,
    }
}

fn get_suggestion_json_schema() -> JsonSchemaDefinition {
    let mut ingredient_properties = HashMap::new();
    ingredient_properties.insert(
        "name".to_string(),
        string_property("The ingredient name, e.g. 'Chicken Breast'."),
    );
    ingredient_properties.insert(
        "amount".to_string(),
        number_property("Quantity for the whole recipe, a non-negative number."),
    );
    ingredient_properties.insert(
        "unit".to_string(),
        string_property("Unit of measurement, e.g. 'g', 'ml', 'whole'."),
    );
    ingredient_properties.insert(
        "category".to_string(),
        string_property("Shopping aisle, e.g. 'Produce', 'Dairy', 'Pantry'."),
    );

    let ingredient_schema = JsonSchema {
        schema_type: "object".to_string(),
        properties: Some(ingredient_properties),
        required: Some(vec![
            "name".to_string(),
            "amount".to_string(),
            "unit".to_string(),
            "category".to_string(),
        ]),
        additional_properties: Some(false),
        items: None,
    };

    let mut recipe_properties = HashMap::new();
    recipe_properties.insert(
        "id".to_string(),
        string_property("A short unique identifier; may be left empty."),
    );
    recipe_properties.insert("name".to_string(), string_property("The recipe title."));
    recipe_properties.insert(
        "description".to_string(),
        string_property("One or two appetizing sentences."),
    );
    recipe_properties.insert(
        "image".to_string(),
        string_property("Placeholder image URL, e.g. 'https://picsum.photos/400/300?random=1'."),
    );
    recipe_properties.insert(
        "prep_time_minutes".to_string(),
        integer_property("Preparation time in minutes."),
    );
    recipe_properties.insert(
        "calories".to_string(),
        integer_property("Approximate calories per serving."),
    );
    recipe_properties.insert(
        "category".to_string(),
        string_property("Dish category, e.g. 'main', 'soup', 'salad'."),
    );
    recipe_properties.insert(
        "tags".to_string(),
        JsonSchemaProperty {
            property_type: "array".to_string(),
            description: Some("Free-form tags such as 'vegetarian' or 'quick'.".to_string()),
            r#enum: None,
            items: Some(Box::new(JsonSchema {
                schema_type: "string".to_string(),
                properties: None,
                required: None,
                additional_properties: None,
                items: None,
            })),
        },
    );
    recipe_properties.insert(
        "ingredients".to_string(),
        JsonSchemaProperty {
            property_type: "array".to_string(),
            description: Some("The recipe's ingredient list.".to_string()),
            r#enum: None,
            items: Some(Box::new(ingredient_schema)),
        },
    );

    let recipe_schema = JsonSchema {
        schema_type: "object".to_string(),
        properties: Some(recipe_properties),
        required: Some(vec![
            "name".to_string(),
            "description".to_string(),
            "prep_time_minutes".to_string(),
            "category".to_string(),
            "ingredients".to_string(),
        ]),
        additional_properties: Some(false),
        items: None,
    };

    JsonSchemaDefinition {
        name: "suggested_recipes_schema".to_string(),
        strict: Some(true),
        schema: JsonSchema {
            schema_type: "array".to_string(),
            properties: None,
            required: None,
            additional_properties: None,
            items: Some(Box::new(recipe_schema)),
        },
    }
}

fn build_system_prompt(count: usize) -> String {
    format!(
        "/no_thinking
You are an expert meal planner. Your task is to suggest {count} distinct recipes matching the given user profile.
Return the output as a JSON array. The JSON array must be the only content in your response. Do not include any explanatory text, comments, or markdown formatting (like ```json) before or after it.
Each element must be an object with these properties:
- \"id\": a short identifier string (may be empty).
- \"name\": the recipe title.
- \"description\": one or two appetizing sentences.
- \"image\": a placeholder URL like \"https://picsum.photos/400/300?random=1\".
- \"prep_time_minutes\": preparation time in minutes, as a number.
- \"calories\": approximate calories per serving, as a number.
- \"category\": a dish category such as \"main\", \"soup\", \"salad\".
- \"tags\": an array of free-form tag strings.
- \"ingredients\": an array of objects, each with string \"name\", number \"amount\", string \"unit\" and string \"category\" (the shopping aisle, e.g. \"Produce\").
Never suggest a recipe containing an ingredient the user is allergic to.
Your response must start with [ and end with ].
"
    )
}

fn build_user_prompt(profile: &UserProfile, context: &str) -> String {
    format!(
        "User Profile:
- Diet: {:?}
- Household Size: {}
- Allergies: {}
- Goals: {}
- Cooking Time Preference: {:?}

Context: {}
",
        profile.diet_type,
        profile.household_size,
        profile.allergies.join(", "),
        profile.goals.join(", "),
        profile.cooking_time,
        context
    )
}

/// Asks the suggestion service for recipes matching the profile. Degrades to
/// an empty list on every failure mode (missing key, network error, malformed
/// response); the caller only ever sees "got records" or "got none".
pub async fn suggest_recipes(
    profile: &UserProfile,
    context: &str,
    api_key_env_var: &str,
) -> Vec<Recipe> {
    match request_suggestions(profile, context, api_key_env_var).await {
        Ok(recipes) => recipes,
        Err(e) => {
            warn!("recipe suggestion failed, continuing without: {}", e);
            Vec::new()
        }
    }
}

async fn request_suggestions(
    profile: &UserProfile,
    context: &str,
    api_key_env_var: &str,
) -> Result<Vec<Recipe>, ApiConnectionError> {
    let provider = Provider::openrouter(api_key_env_var);

    let request = ChatCompletionRequest {
        model: SUGGESTION_MODEL.to_string(),
        messages: vec![
            ChatMessage::system(build_system_prompt(DEFAULT_SUGGESTION_COUNT)),
            ChatMessage::user(build_user_prompt(profile, context)),
        ],
        response_format: Some(ResponseFormat {
            format_type: "json_schema".to_string(),
            json_schema: Some(get_suggestion_json_schema()),
        }),
        temperature: Some(0.7),
        max_tokens: Some(2048),
    };

    let response = provider.call_chat_completion(request).await?;

    let choice = match response.choices.first() {
        Some(choice) => choice,
        None => {
            return Err(ApiConnectionError::ApiError {
                status: reqwest::StatusCode::NO_CONTENT,
                error_body: "No response choices received from API".to_string(),
            })
        }
    };

    let mut content_str = choice.message.content.trim().to_string();
    // Models sometimes wrap the payload in markdown fences despite the prompt.
    if content_str.starts_with("```json") && content_str.ends_with("```") {
        content_str = content_str
            .trim_start_matches("```json")
            .trim_end_matches("```")
            .trim()
            .to_string();
    } else if content_str.starts_with("```") && content_str.ends_with("```") {
        content_str = content_str
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim()
            .to_string();
    }

    let mut recipes: Vec<Recipe> = serde_json::from_str(&content_str).map_err(|e| {
        debug!("unparseable suggestion payload: {}", content_str);
        ApiConnectionError::SerializationError(e)
    })?;

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let mut rng = rand::thread_rng();
    for (idx, recipe) in recipes.iter_mut().enumerate() {
        if recipe.id.is_empty() {
            recipe.id = format!("ai-{}-{}", millis, idx);
        }
        recipe.image = format!(
            "https://picsum.photos/400/300?random={}",
            rng.gen_range(0..1000)
        );
    }

    Ok(recipes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{BudgetTier, DietType, TimePreference};

    fn profile() -> UserProfile {
        UserProfile {
            name: "Alex".to_string(),
            household_size: 4,
            has_children: true,
            diet_type: DietType::Pescatarian,
            goals: vec!["quick dinners".to_string()],
            allergies: vec!["shellfish".to_string(), "peanuts".to_string()],
            cooking_time: TimePreference::Low,
            budget: BudgetTier::Budget,
            is_onboarded: true,
        }
    }

    #[test]
    fn test_user_prompt_carries_profile_fields() {
        let prompt = build_user_prompt(&profile(), "I want something for the week.");
        assert!(prompt.contains("Household Size: 4"));
        assert!(prompt.contains("shellfish, peanuts"));
        assert!(prompt.contains("quick dinners"));
        assert!(prompt.contains("I want something for the week."));
    }

    #[test]
    fn test_schema_root_is_recipe_array() {
        let schema = get_suggestion_json_schema();
        assert_eq!(schema.schema.schema_type, "array");
        let recipe_schema = schema.schema.items.expect("array item schema");
        assert_eq!(recipe_schema.schema_type, "object");
        let props = recipe_schema.properties.expect("recipe properties");
        assert!(props.contains_key("ingredients"));
        assert!(props.contains_key("prep_time_minutes"));
    }
}
