//! Featured champions.

use crate::handler::response::{Champion, Champions};

/// Portrait directory served by the frontend.
const IMAGE_DIR: &str = "/champions";

/// `(id, display name, portrait file)` in display order.
const FEATURED: [(&str, &str, &str); 7] = [
    ("leviathan", "Leviathan", "Leviathan.jpg"),
    ("chrispi", "Chrispi", "Chrispi.jpg"),
    ("sona-zusa", "Sona#Zusa", "Sona-Zusa.jpg"),
    ("oogieboogie", "OogieBoogie", "OogieBoogie.jpg"),
    ("rowan", "Rowan", "Rowan.jpg"),
    ("clovix", "Clovix", "Clovix.jpg"),
    ("Himmel", "Himmel", "Himmel.jpg"),
];

/// Static list of featured champions.
#[derive(Debug, Clone)]
pub struct Gallery {
    champions: Champions,
}

impl Default for Gallery {
    fn default() -> Self {
        let champions = FEATURED
            .iter()
            .map(|(id, name, file)| Champion {
                id: (*id).to_owned(),
                name: (*name).to_owned(),
                image: format!("{IMAGE_DIR}/{file}"),
            })
            .collect();
        Self { champions }
    }
}

impl Gallery {
    pub fn champions(&self) -> &[Champion] {
        &self.champions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_keep_special_characters() {
        let gallery = Gallery::default();
        let sona = gallery
            .champions()
            .iter()
            .find(|c| c.id == "sona-zusa")
            .map(|c| (c.name.as_str(), c.image.as_str()));
        assert_eq!(sona, Some(("Sona#Zusa", "/champions/Sona-Zusa.jpg")));
        assert_eq!(gallery.champions().len(), 7);
    }
}
