//! Display configuration for categories: icon identifier and hex color.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Category;

/// Icon and color used to render a category in charts and lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStyle {
    pub icon: String,
    pub color: String,
}

impl CategoryStyle {
    pub fn new(icon: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            color: color.into(),
        }
    }
}

/// Lookup table from category to style
///
/// Categories without an entry resolve to the fallback style, so a lookup
/// never fails.
#[derive(Debug, Clone)]
pub struct CategoryPalette {
    styles: HashMap<Category, CategoryStyle>,
    fallback: CategoryStyle,
}

impl CategoryPalette {
    /// An empty table where every category resolves to `fallback`
    pub fn with_fallback(fallback: CategoryStyle) -> Self {
        Self {
            styles: HashMap::new(),
            fallback,
        }
    }

    /// Set or replace the style of one category
    pub fn set(&mut self, category: Category, style: CategoryStyle) {
        self.styles.insert(category, style);
    }

    /// Icon and color for `category`
    ///
    /// # Returns
    ///
    /// The configured style, or the fallback style when the category has
    /// no entry. Never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use finance_tracker::models::Category;
    /// use finance_tracker::palette::{CategoryPalette, CategoryStyle};
    ///
    /// let fallback = CategoryStyle::new("help-circle", "#999999");
    /// let palette = CategoryPalette::with_fallback(fallback.clone());
    ///
    /// assert_eq!(palette.style(Category::Food), &fallback);
    /// ```
    pub fn style(&self, category: Category) -> &CategoryStyle {
        self.styles.get(&category).unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &CategoryStyle {
        &self.fallback
    }
}

impl Default for CategoryPalette {
    fn default() -> Self {
        let mut palette = Self::with_fallback(CategoryStyle::new("grid", "#B2BEC3"));

        palette.set(Category::Food, CategoryStyle::new("fast-food", "#FF7675"));
        palette.set(Category::Transport, CategoryStyle::new("car", "#74B9FF"));
        palette.set(
            Category::Leisure,
            CategoryStyle::new("game-controller", "#A29BFE"),
        );
        palette.set(Category::Health, CategoryStyle::new("medkit", "#55EFC4"));
        palette.set(Category::Home, CategoryStyle::new("home", "#FDCB6E"));
        palette.set(Category::Salary, CategoryStyle::new("briefcase", "#00B894"));
        palette.set(Category::Freelance, CategoryStyle::new("laptop", "#0984E3"));
        palette.set(
            Category::Investments,
            CategoryStyle::new("trending-up", "#6C5CE7"),
        );
        palette.set(Category::Gifts, CategoryStyle::new("gift", "#E84393"));

        palette
    }
}
