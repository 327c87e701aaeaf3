//! Static OpenAPI 3 description of the rate endpoints.

use serde_json::{Value, json};

fn currency_code_param() -> Value {
    json!({
        "name": "currencyCode",
        "in": "query",
        "required": true,
        "description": "Base currency the returned rates are expressed against.",
        "schema": { "type": "string", "example": "USD" }
    })
}

fn date_param(name: &str, required: bool, description: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": required,
        "description": description,
        "schema": { "type": "string", "format": "date" }
    })
}

fn rates_response(description: &str) -> Value {
    json!({
        "200": {
            "description": description,
            "content": {
                "application/json": {
                    "schema": {
                        "type": "array",
                        "items": { "$ref": "#/components/schemas/ExchangeRate" }
                    }
                }
            }
        },
        "400": { "$ref": "#/components/responses/BadRequest" },
        "500": { "$ref": "#/components/responses/ServerError" },
        "502": { "$ref": "#/components/responses/UpstreamError" }
    })
}

fn currencies_path() -> Value {
    json!({
        "get": {
            "summary": "Gets a list of all available currencies from ECB.",
            "responses": {
                "200": {
                    "description": "Sorted currency codes, EUR included.",
                    "content": {
                        "application/json": {
                            "schema": { "type": "array", "items": { "type": "string" } }
                        }
                    }
                },
                "502": { "$ref": "#/components/responses/UpstreamError" }
            }
        }
    })
}

fn rates_path(summary: &str, parameters: Vec<Value>, description: &str) -> Value {
    json!({
        "get": {
            "summary": summary,
            "parameters": parameters,
            "responses": rates_response(description)
        }
    })
}

fn components() -> Value {
    let error_content = json!({
        "application/json": { "schema": { "$ref": "#/components/schemas/Error" } }
    });
    let exchange_rate = json!({
        "type": "object",
        "required": ["currencyCode", "rate", "date"],
        "properties": {
            "currencyCode": { "type": "string" },
            "rate": { "type": "number" },
            "date": { "type": "string", "format": "date" }
        }
    });

    json!({
        "schemas": {
            "ExchangeRate": exchange_rate,
            "Error": { "type": "object", "properties": { "error": { "type": "string" } } }
        },
        "responses": {
            "BadRequest": { "description": "Missing or invalid parameter.", "content": error_content },
            "ServerError": { "description": "Currency not found or no history.", "content": error_content },
            "UpstreamError": { "description": "ECB feed unreachable or malformed.", "content": error_content }
        }
    })
}

pub fn openapi_document() -> Value {
    let rates = rates_path(
        "Gets exchange rates for a currency within a date range.",
        vec![
            currency_code_param(),
            date_param("dtStart", false, "Inclusive start date."),
            date_param("dtEnd", false, "Inclusive end date."),
        ],
        "Rates ordered by date, then currency code.",
    );
    let rates_by_date = rates_path(
        "Gets exchange rates for a currency on a specific date.",
        vec![
            currency_code_param(),
            date_param("dtEff", true, "Effective date."),
        ],
        "Rates for the effective date.",
    );
    let latest = rates_path(
        "Gets the latest exchange rates for a currency.",
        vec![currency_code_param()],
        "Rates on the most recent published date.",
    );

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "ECB Exchange Rate API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "API for retrieving ECB exchange rates"
        },
        "paths": {
            "/currencies": currencies_path(),
            "/rates": rates,
            "/rates/date": rates_by_date,
            "/rates/latest": latest
        },
        "components": components()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_rate_path() {
        let doc = openapi_document();
        let paths = doc["paths"].as_object().unwrap();
        for path in ["/currencies", "/rates", "/rates/date", "/rates/latest"] {
            assert!(paths.contains_key(path), "missing {path}");
        }

        let params = doc["paths"]["/rates/date"]["get"]["parameters"]
            .as_array()
            .unwrap();
        assert!(params.iter().all(|p| p["required"] == true));
    }
}
