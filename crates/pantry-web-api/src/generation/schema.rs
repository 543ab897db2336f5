//! Response schemas handed to the generation service, so it answers with
//! json that matches the payloads in `pantry_meal_api::raw`.

use serde_json::{json, Value};

fn string(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn number(description: &str) -> Value {
    json!({ "type": "NUMBER", "description": description })
}

fn list(items: Value, description: &str) -> Value {
    json!({ "type": "ARRAY", "items": items, "description": description })
}

pub fn analysis() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "identifiedIngredients": list(json!({
                "type": "OBJECT",
                "properties": {
                    "name": string("Nombre común del alimento en español, por ejemplo \"Tomate\"."),
                    "spoilageTime": string("Vida útil conservadora, con el formato \"X días\" o \"X semanas\"."),
                    "category": string("Categoría en español: \"Frutas y Verduras\", \"Carnes\", \"Lácteos\" o \"Despensa\"."),
                },
                "required": ["name", "spoilageTime", "category"],
            }), "Alimentos visibles en las fotos, sin repetir."),
            "recipeSuggestions": list(json!({
                "type": "OBJECT",
                "properties": {
                    "title": string("Título de la receta."),
                    "description": string("Descripción breve."),
                    "ingredientsUsed": list(json!({ "type": "STRING" }), "Ingredientes que usa."),
                    "instructions": string("Preparación paso a paso."),
                },
                "required": ["title", "description", "ingredientsUsed", "instructions"],
            }), "Tres recetas con los alimentos identificados."),
        },
        "required": ["identifiedIngredients", "recipeSuggestions"],
    })
}

pub fn daily_requirements() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "calories": number("Calorías diarias."),
            "protein": number("Gramos de proteína al día."),
            "carbs": number("Gramos de carbohidratos al día."),
            "fat": number("Gramos de grasa al día."),
        },
        "required": ["calories", "protein", "carbs", "fat"],
    })
}

pub fn assessment() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": number("Balance de la compra de 1 a 10."),
            "summary": string("Una frase sobre el balance."),
            "missingGroups": list(json!({ "type": "STRING" }), "Grupos de alimentos que faltan o son escasos."),
            "suggestions": list(json!({
                "type": "OBJECT",
                "properties": {
                    "item": string("Producto concreto para comprar."),
                    "category": string("Categoría del producto."),
                    "reason": string("Cómo mejora el balance."),
                },
                "required": ["item", "category", "reason"],
            }), "Productos para completar la despensa, el más útil primero."),
        },
        "required": ["score", "summary", "missingGroups", "suggestions"],
    })
}

fn meal() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": string("Nombre del plato."),
            "calories": number("Calorías de una porción de adulto."),
            "protein": number("Gramos de proteína."),
            "carbs": number("Gramos de carbohidratos."),
            "fat": number("Gramos de grasa."),
            "micronutrients": string("Micronutrientes destacados."),
            "imagePrompt": string("Prompt en inglés para una fotografía editorial del plato."),
            "instructions": string("Preparación paso a paso."),
        },
        "required": [
            "name", "calories", "protein", "carbs", "fat",
            "micronutrients", "imagePrompt", "instructions",
        ],
    })
}

pub fn weekly_plan() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "dailyPlans": list(json!({
                "type": "OBJECT",
                "properties": {
                    "day": string("Día en inglés y minúsculas, por ejemplo \"monday\"."),
                    "breakfast": meal(),
                    "morningSnack": meal(),
                    "lunch": meal(),
                    "afternoonSnack": meal(),
                    "dinner": meal(),
                    "waterIntakeLiters": number("Litros de agua recomendados."),
                },
                "required": [
                    "day", "breakfast", "morningSnack", "lunch",
                    "afternoonSnack", "dinner", "waterIntakeLiters",
                ],
            }), "Siete días, de sunday a saturday."),
        },
        "required": ["dailyPlans"],
    })
}

/// `{ <field>: [string] }`
pub fn strings(field: &str) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            field: list(json!({ "type": "STRING" }), ""),
        },
        "required": [field],
    })
}

pub fn complementary() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "suggestions": list(json!({
                "type": "OBJECT",
                "properties": {
                    "productName": string("Nombre del producto en español."),
                    "reason": string("Por qué complementa el menú."),
                },
                "required": ["productName", "reason"],
            }), ""),
        },
        "required": ["suggestions"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_schema_requires_every_slot() {
        let schema = weekly_plan();
        let day = &schema["properties"]["dailyPlans"]["items"];
        let required: Vec<_> = day["required"].as_array().unwrap().iter()
            .filter_map(Value::as_str)
        .collect();

        for slot in pantry_meal_api::MealSlot::ALL {
            assert!(required.contains(&slot.key()), "{slot} is not required");
        }
        assert_eq!(day["properties"]["lunch"]["properties"]["imagePrompt"]["type"], "STRING");
    }

    #[test]
    fn strings_uses_field_name() {
        let schema = strings("tips");
        assert_eq!(schema["required"][0], "tips");
        assert_eq!(schema["properties"]["tips"]["type"], "ARRAY");
    }
}
