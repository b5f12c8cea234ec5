//! Case-conversion filters registered on every engine.
//!
//! Templates and output-path expressions use these to derive identifiers
//! from model names, e.g. `{{ name | snake_case }}.rs`.

use std::collections::HashMap;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};
use tera::{Tera, Value};

/// Register every filter on a Tera instance.
pub(crate) fn register_all(tera: &mut Tera) {
    tera.register_filter("snake_case", snake_case);
    tera.register_filter("pascal_case", pascal_case);
    tera.register_filter("camel_case", camel_case);
    tera.register_filter("kebab_case", kebab_case);
    tera.register_filter("shouty_snake_case", shouty_snake_case);
}

fn expect_str<'a>(value: &'a Value, filter: &str) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{filter} filter expects a string")))
}

pub(crate) fn snake_case(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(expect_str(value, "snake_case")?.to_snake_case()))
}

pub(crate) fn pascal_case(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(
        expect_str(value, "pascal_case")?.to_pascal_case(),
    ))
}

pub(crate) fn camel_case(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(
        expect_str(value, "camel_case")?.to_lower_camel_case(),
    ))
}

pub(crate) fn kebab_case(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(expect_str(value, "kebab_case")?.to_kebab_case()))
}

pub(crate) fn shouty_snake_case(
    value: &Value,
    _args: &HashMap<String, Value>,
) -> tera::Result<Value> {
    Ok(Value::String(
        expect_str(value, "shouty_snake_case")?.to_shouty_snake_case(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    type Filter = fn(&Value, &HashMap<String, Value>) -> tera::Result<Value>;

    fn apply(filter: Filter, input: &str) -> String {
        let value = Value::String(input.to_string());
        filter(&value, &HashMap::new())
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_case_conversions() {
        assert_eq!(apply(snake_case, "GetForecast"), "get_forecast");
        assert_eq!(apply(pascal_case, "get_forecast"), "GetForecast");
        assert_eq!(apply(camel_case, "GetForecast"), "getForecast");
        assert_eq!(apply(kebab_case, "GetForecast"), "get-forecast");
        assert_eq!(apply(shouty_snake_case, "GetForecast"), "GET_FORECAST");
    }

    #[test]
    fn test_already_converted_inputs_stable() {
        assert_eq!(apply(snake_case, "already_snake"), "already_snake");
        assert_eq!(apply(pascal_case, "AlreadyPascal"), "AlreadyPascal");
    }

    #[test]
    fn test_filters_reject_non_strings() {
        let value = Value::Number(7.into());
        for (name, filter) in [("snake_case", snake_case as Filter), ("kebab_case", kebab_case)]
        {
            let err = filter(&value, &HashMap::new()).unwrap_err();
            assert!(err.to_string().contains(name));
        }
    }

    #[test]
    fn test_registered_on_engine() {
        let mut tera = Tera::default();
        register_all(&mut tera);
        tera.add_raw_template("t", "{{ name | shouty_snake_case }}").unwrap();
        let mut context = tera::Context::new();
        context.insert("name", "maxRetries");
        assert_eq!(tera.render("t", &context).unwrap(), "MAX_RETRIES");
    }
}
