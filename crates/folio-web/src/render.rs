//! Page rendering with Handlebars
//!
//! Each page template renders the page body, which is then embedded into the
//! shared `common` layout as `{{{content}}}`. Strict mode is on: a string
//! missing from the context fails the render instead of coming out empty.

use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

const LAYOUT_TEMPLATE: &str = "common";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to load template '{name}': {source}")]
    Load {
        name: &'static str,
        #[source]
        source: handlebars::TemplateError,
    },

    #[error("failed to render template '{name}': {source}")]
    Render {
        name: &'static str,
        #[source]
        source: handlebars::RenderError,
    },
}

/// Pages the site serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Landing,
    Presentation,
    LanguageSelector,
    About,
    Work,
    Contact,
    Legal,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Landing,
        Page::Presentation,
        Page::LanguageSelector,
        Page::About,
        Page::Work,
        Page::Contact,
        Page::Legal,
    ];

    /// Template name, also the file stem under the template directory.
    pub fn template_name(self) -> &'static str {
        match self {
            Page::Landing => "landing",
            Page::Presentation => "presentation",
            Page::LanguageSelector => "language_selector",
            Page::About => "about",
            Page::Work => "work",
            Page::Contact => "contact",
            Page::Legal => "legal",
        }
    }
}

#[derive(Serialize)]
struct LayoutContext<'a, T: Serialize> {
    #[serde(flatten)]
    page: &'a T,
    content: String,
}

pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    /// Register `common.hbs` and every page template found in `dir`.
    ///
    /// With `reload` set, templates are re-read from disk on each render.
    pub fn from_dir(dir: &Path, reload: bool) -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.set_dev_mode(reload);

        let names = std::iter::once(LAYOUT_TEMPLATE).chain(Page::ALL.map(Page::template_name));
        for name in names {
            let path = dir.join(format!("{name}.hbs"));
            registry
                .register_template_file(name, &path)
                .map_err(|source| TemplateError::Load { name, source })?;
        }

        tracing::debug!(dir = %dir.display(), reload, "Templates registered");
        Ok(Self { registry })
    }

    /// Render `page` inside the common layout.
    pub fn render<T: Serialize>(&self, page: Page, context: &T) -> Result<String, TemplateError> {
        let name = page.template_name();
        let content = self
            .registry
            .render(name, context)
            .map_err(|source| TemplateError::Render { name, source })?;

        let layout = LayoutContext {
            page: context,
            content,
        };
        self.registry
            .render(LAYOUT_TEMPLATE, &layout)
            .map_err(|source| TemplateError::Render {
                name: LAYOUT_TEMPLATE,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn template_dir(page_body: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("common.hbs"),
            "<main lang=\"{{lang}}\">{{{content}}}</main>",
        )
        .unwrap();
        for page in Page::ALL {
            fs::write(
                dir.path().join(format!("{}.hbs", page.template_name())),
                page_body,
            )
            .unwrap();
        }
        dir
    }

    #[test]
    fn test_page_is_wrapped_in_layout() {
        let dir = template_dir("<h1>{{title}}</h1>");
        let renderer = PageRenderer::from_dir(dir.path(), false).unwrap();
        let html = renderer
            .render(Page::About, &json!({ "lang": "fr", "title": "Salut" }))
            .unwrap();
        assert_eq!(html, "<main lang=\"fr\"><h1>Salut</h1></main>");
    }

    #[test]
    fn test_strings_are_escaped() {
        let dir = template_dir("{{title}}");
        let renderer = PageRenderer::from_dir(dir.path(), false).unwrap();
        let html = renderer
            .render(Page::Work, &json!({ "lang": "en", "title": "<b>" }))
            .unwrap();
        assert_eq!(html, "<main lang=\"en\">&lt;b&gt;</main>");
    }

    #[test]
    fn test_missing_string_fails_render() {
        let dir = template_dir("{{title}}");
        let renderer = PageRenderer::from_dir(dir.path(), false).unwrap();
        let err = renderer
            .render(Page::Legal, &json!({ "lang": "en" }))
            .unwrap_err();
        assert!(matches!(err, TemplateError::Render { name: "legal", .. }));
    }

    #[test]
    fn test_missing_template_file() {
        let dir = TempDir::new().unwrap();
        let err = PageRenderer::from_dir(dir.path(), false)
            .err()
            .expect("empty directory must fail");
        assert!(matches!(err, TemplateError::Load { name: "common", .. }));
    }
}
