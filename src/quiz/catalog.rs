//! Built-in categories with their default pictures and multimedia questions.

use super::question::{Category, MediaKind, Question};

pub struct CategoryEntry {
    pub category: Category,
    pub name: &'static str,
    pub image: &'static str,
}

const DEFAULT_IMAGE: &str =
    "https://images.unsplash.com/photo-1513258496099-48168024aec0?auto=format&fit=crop&w=400&q=80";
const DOG_IMAGE: &str =
    "https://images.unsplash.com/photo-1518717758536-85ae29035b6d?auto=format&fit=crop&w=400&q=80";

pub const CATEGORIES: [CategoryEntry; 6] = [
    CategoryEntry {
        category: Category::Any,
        name: "Any Category",
        image: DEFAULT_IMAGE,
    },
    CategoryEntry {
        category: Category::Id(9),
        name: "General Knowledge",
        image: DEFAULT_IMAGE,
    },
    CategoryEntry {
        category: Category::Id(17),
        name: "Science & Nature",
        image: "https://images.unsplash.com/photo-1464983953574-0892a716854b?auto=format&fit=crop&w=400&q=80",
    },
    CategoryEntry {
        category: Category::Id(21),
        name: "Sports",
        image: "https://images.unsplash.com/photo-1517841905240-472988babdf9?auto=format&fit=crop&w=400&q=80",
    },
    CategoryEntry {
        category: Category::Id(22),
        name: "Geography",
        image: "https://images.unsplash.com/photo-1510936111840-6c7d9c5c1b43?auto=format&fit=crop&w=400&q=80",
    },
    CategoryEntry {
        category: Category::Id(23),
        name: "History",
        image: "https://images.unsplash.com/photo-1503676382389-4809596d5290?auto=format&fit=crop&w=400&q=80",
    },
];

/// Picture shown above questions that carry no media of their own.
pub fn default_image(category: Category) -> &'static str {
    CATEGORIES
        .iter()
        .find(|entry| entry.category == category)
        .map(|entry| entry.image)
        .unwrap_or(DEFAULT_IMAGE)
}

fn answers(list: [&str; 4]) -> Vec<String> {
    list.into_iter().map(String::from).collect()
}

fn animal_question() -> Question {
    Question::new(
        "Which animal is shown in this image?",
        answers(["Cat", "Dog", "Rabbit", "Horse"]),
        1,
    )
    .with_media(MediaKind::Image, DOG_IMAGE)
}

/// Multimedia questions that open a quiz in the given category.
pub fn fixed_questions(category: Category) -> Vec<Question> {
    match category {
        Category::Any | Category::Id(9) => vec![animal_question()],
        Category::Id(17) => vec![Question::new(
            "What is shown in this science image?",
            answers(["Atom", "Cell", "Galaxy", "Molecule"]),
            1,
        )
        .with_media(
            MediaKind::Image,
            "https://images.unsplash.com/photo-1465101046530-73398c7f28ca?auto=format&fit=crop&w=400&q=80",
        )],
        Category::Id(23) => vec![Question::new(
            "Listen to this historical speech. Who is the speaker?",
            answers([
                "Martin Luther King Jr.",
                "John F. Kennedy",
                "Winston Churchill",
                "Nelson Mandela",
            ]),
            0,
        )
        .with_media(
            MediaKind::Audio,
            "https://ia800701.us.archive.org/13/items/MLKDream/MLKDream.mp3",
        )],
        Category::Id(21) => vec![Question::new(
            "Which sport is shown in this video?",
            answers(["Basketball", "Soccer", "Tennis", "Swimming"]),
            1,
        )
        .with_media(MediaKind::Video, "https://www.w3schools.com/html/mov_bbb.mp4")],
        Category::Id(22) => vec![Question::new(
            "Which landmark is shown in this image?",
            answers(["Eiffel Tower", "Statue of Liberty", "Colosseum", "Great Wall"]),
            0,
        )
        .with_media(
            MediaKind::Image,
            "https://images.unsplash.com/photo-1506744038136-46273834b3fb?auto=format&fit=crop&w=400&q=80",
        )],
        Category::Id(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_category_falls_back_to_any_image() {
        assert_eq!(default_image(Category::Id(12)), default_image(Category::Any));
        assert_eq!(default_image(Category::Id(31)), DEFAULT_IMAGE);
    }

    #[test]
    fn configured_categories_have_their_own_image() {
        assert!(default_image(Category::Id(17)).contains("photo-1464983953574"));
        assert!(default_image(Category::Id(23)).contains("photo-1503676382389"));
    }

    #[test]
    fn general_knowledge_opens_with_the_dog_picture() {
        let questions = fixed_questions(Category::Id(9));
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Which animal is shown in this image?");
        assert_eq!(questions[0].correct, 1);
        assert_eq!(questions[0].correct_answer(), "Dog");
        assert_eq!(questions[0].media.as_ref().unwrap().kind, MediaKind::Image);
        assert_eq!(questions[0].user_answer, None);
    }

    #[test]
    fn every_listed_category_has_a_fixed_question() {
        for entry in CATEGORIES.iter() {
            let questions = fixed_questions(entry.category);
            assert_eq!(questions.len(), 1, "{}", entry.name);
            assert_eq!(questions[0].answers.len(), 4);
        }
        assert!(fixed_questions(Category::Id(15)).is_empty());
    }
}
