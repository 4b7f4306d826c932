use proptest::prelude::*;

use tracereverse::catalog::Project;
use tracereverse::search::classify::{classify, derive_difficulty, derive_duration};

fn project(stack: Vec<String>, concepts: usize, instructions: usize) -> Project {
    Project::new("p", "P")
        .with_stack(stack)
        .with_concepts((0..concepts).map(|i| format!("c{i}")))
        .with_instructions((0..instructions).map(|i| format!("s{i}")))
}

proptest! {
    #[test]
    fn test_classification_deterministic(
        stack in proptest::collection::vec("[A-Za-z.]{1,12}", 0..8),
        concepts in 0usize..20,
        instructions in 0usize..40,
    ) {
        let p = project(stack, concepts, instructions);
        prop_assert_eq!(classify(&p), classify(&p));
    }

    #[test]
    fn test_more_concepts_never_lower_difficulty(
        stack in proptest::collection::vec("[A-Za-z.]{1,12}", 0..6),
        concepts in 0usize..15,
        extra in 0usize..10,
    ) {
        let base = derive_difficulty(&project(stack.clone(), concepts, 0));
        let more = derive_difficulty(&project(stack, concepts + extra, 0));
        prop_assert!(more.ordinal() >= base.ordinal());
    }

    #[test]
    fn test_more_steps_never_shorten_duration(
        concepts in 0usize..30,
        instructions in 0usize..60,
        extra in 0usize..20,
    ) {
        let base = derive_duration(&project(Vec::new(), concepts, instructions));
        let more = derive_duration(&project(Vec::new(), concepts, instructions + extra));
        prop_assert!(more.ordinal() >= base.ordinal());
    }
}

mod paths {
    use std::sync::Arc;

    use proptest::prelude::*;

    use tracereverse::paths::{LearningPathCatalog, LearningPathManager};
    use tracereverse::test_utils::UnitTestFixture;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_path_completion_is_bounded(
            path_index in 0usize..6,
            slugs in proptest::collection::vec("[a-z]{1,6}", 0..12),
        ) {
            let catalog = Arc::new(LearningPathCatalog::embedded().unwrap());
            let path = catalog.paths()[path_index].clone();
            let manager = LearningPathManager::new(UnitTestFixture::memory_store(), catalog);
            manager.start_path(&path.id, "prop").unwrap();

            for slug in path.projects.iter().chain(slugs.iter()) {
                manager.complete_project("prop", &path.id, slug).unwrap();
            }

            let percent = manager.completion_percent("prop", &path.id).unwrap();
            prop_assert!((0.0..=100.0).contains(&percent));
            let progress = &manager.path_progress("prop").unwrap()[0];
            prop_assert!(progress.current_project_index <= path.projects.len());
        }
    }
}
