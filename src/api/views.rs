use minijinja::Environment;
use serde::Serialize;

use crate::utils::errors::ApiError;

pub const INDEX: &str = "index.html";
pub const LIST: &str = "list.html";
pub const REGISTER: &str = "register.html";
pub const UPDATE: &str = "update.html";
pub const ADMIN: &str = "admin.html";

const TEMPLATES: [(&str, &str); 8] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("_cards.html", include_str!("../../templates/_cards.html")),
    ("_form.html", include_str!("../../templates/_form.html")),
    (INDEX, include_str!("../../templates/index.html")),
    (LIST, include_str!("../../templates/list.html")),
    (REGISTER, include_str!("../../templates/register.html")),
    (UPDATE, include_str!("../../templates/update.html")),
    (ADMIN, include_str!("../../templates/admin.html")),
];

#[derive(Serialize, Clone, Copy, Debug)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: &'static str,
}

/// Inputs of the registration and update forms, in display order.
pub const FORM_FIELDS: [FormField; 9] = [
    FormField { name: "name", label: "Name", kind: "text" },
    FormField { name: "species", label: "Species", kind: "text" },
    FormField { name: "breed", label: "Breed", kind: "text" },
    FormField { name: "age", label: "Age", kind: "number" },
    FormField { name: "description", label: "Description", kind: "text" },
    FormField { name: "email", label: "Email", kind: "email" },
    FormField { name: "address", label: "Address", kind: "text" },
    FormField { name: "city", label: "City", kind: "text" },
    FormField { name: "postalCode", label: "Postal code", kind: "text" },
];

/// HTML templates, compiled once at startup.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Views { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, ApiError> {
        let template = self.env.get_template(name)?;
        let html = template.render(context).map_err(|e| {
            log::error!("Failed to render {}: {:#}", name, e);
            e
        })?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::animal::model::{Animal, AnimalForm, Page, PageRequest};
    use minijinja::context;

    fn rex() -> Animal {
        Animal {
            id: 1,
            name: "Rex".to_string(),
            species: "Dog".to_string(),
            breed: "Beagle".to_string(),
            age: 4,
            description: Some("<b>good boy</b>".to_string()),
            email: "rex@example.com".to_string(),
            address: "1 rue de la Paix".to_string(),
            city: "Paris".to_string(),
            postal_code: "75002".to_string(),
        }
    }

    #[test]
    fn test_all_templates_compile() {
        let views = Views::new().unwrap();
        for (name, _) in TEMPLATES {
            assert!(views.env.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_list_escapes_user_content() {
        let views = Views::new().unwrap();
        let animals = vec![rex()];
        let page = Page::new(animals.clone(), PageRequest::new(1, 9), 1);

        let html = views
            .render(LIST, context! { page => page, animals => animals, query => "" })
            .unwrap();
        assert!(html.contains("Rex"));
        assert!(html.contains("&lt;b&gt;good boy"));
        assert!(!html.contains("<b>good boy"));
    }

    #[test]
    fn test_list_renders_pagination_buttons() {
        let views = Views::new().unwrap();
        let page: Page<Animal> = Page::new(vec![], PageRequest::new(2, 9), 20);

        let html = views
            .render(LIST, context! { page => page, animals => Vec::<Animal>::new(), query => "cat" })
            .unwrap();
        assert!(html.contains(r#"name="page" value="3""#));
        assert!(html.contains(r#"value="cat""#));
    }

    #[test]
    fn test_form_shows_values_and_errors() {
        let views = Views::new().unwrap();
        let form = AnimalForm::from(&rex());
        let errors = std::collections::BTreeMap::from([("postalCode", "Postal code is required.")]);

        let html = views
            .render(
                REGISTER,
                context! {
                    form => form,
                    errors => errors,
                    fields => FORM_FIELDS,
                    action => "/animals/register",
                    submit => "Register",
                },
            )
            .unwrap();
        assert!(html.contains(r#"value="rex@example.com""#));
        assert!(html.contains("Postal code is required."));
    }

    #[test]
    fn test_unknown_template() {
        let views = Views::new().unwrap();
        let error = views.render("missing.html", context! {}).unwrap_err();
        assert!(matches!(error, ApiError::Template(_)));
    }
}
