//! Static record corpora used across harnesses.
//!
//! [`content_tree`] is a small snapshot in export layout with one record of
//! every shape the built-in repair plan cares about: legacy field names,
//! boolean answers stored as booleans, lower-case options, missing ordering,
//! legitimately-zero counters that must survive, and so on.

use serde_json::{json, Value};

/// Question texts that must classify as boolean through text alone.
pub const KEYWORD_QUESTIONS: &[&str] = &[
    "True or False: Python lists are mutable.",
    "TRUE OR FALSE - tuples can be modified after creation",
    "Answer true or false: `is` compares identity.",
];

/// Question texts that carry no boolean signal.
pub const PLAIN_QUESTIONS: &[&str] = &[
    "Which keyword defines a function in Python?",
    "What is the output of print(2 ** 3)?",
    "Is it true that lists are ordered?",
];

/// Snapshot of a small course in export layout.
pub fn content_tree() -> Value {
    json!({
        "courses": {
            "python": {
                "title": "Python Programming",
                "description": "From zero to scripts",
                "language": "python",
                "difficulty": "beginner",
                "moduleCount": 8,
                "rating": 0,
                "icon": "🐍"
            }
        },
        "achievements": {
            "first_lesson": { "title": "First Steps", "icon": "first_steps.png" },
            "quiz_master": { "title": "Quiz Master", "icon": "quiz.png", "iconAsset": "quiz_master.png" }
        },
        "user_stats": {
            "user_1": {
                "totalLessonsCompleted": 12,
                "totalQuizzesCompleted": 3,
                "currentStreak": 0,
                "level": 4
            }
        },
        "modules": {
            "module_1": { "courseId": "python", "lessonIds": ["lesson_1"] },
            "module_2": { "courseId": "", "lessonIds": "lesson_2" }
        },
        "lessons": {
            "lesson_1": {
                "moduleId": "module_1",
                "courseId": "python",
                "xpReward": 0,
                "keyPoints": ["Variables hold values"]
            }
        },
        "progress": {
            "user_1_python": { "completionPercentage": 0, "quizScores": { "quiz_1": 80 } }
        },
        "quizzes": {
            "quiz_1": {
                "title": "Python Variables & Data Types",
                "__collections__": {
                    "questions": {
                        "q_b": {
                            "question": "True or False: Python is statically typed.",
                            "options": ["true", "false"],
                            "correctAnswer": false,
                            "points": 0
                        },
                        "q_a": {
                            "question": "What will be the output?",
                            "type": "multiple_choice",
                            "options": ["True", "False", "Error", "None"],
                            "correctAnswer": "False",
                            "difficulty": "medium"
                        },
                        "q_c": {
                            "question": "Is Python compiled?",
                            "options": ["True", "False"],
                            "correctAnswer": "FALSE",
                            "orderIndex": 9
                        }
                    }
                }
            },
            "quiz_2": {
                "title": "Python Control Flow",
                "__collections__": {
                    "questions": {
                        "q_1": {
                            "question": "What does this list comprehension produce?",
                            "type": "multiple_choice",
                            "options": ["[0, 4]", "[0, 1, 4, 9]"],
                            "correctAnswer": "[0, 4]",
                            "orderIndex": 0,
                            "points": 2,
                            "difficulty": "hard",
                            "codeSnippet": ""
                        }
                    }
                }
            }
        }
    })
}

/// Snippet catalog matching [`content_tree`].
pub const SNIPPET_CATALOG: &str = r#"{
    "Python Variables & Data Types": {
        "What will be the output?": {
            "codeSnippet": "x = 5\ny = '5'\nprint(x == y)",
            "correctAnswer": "False"
        }
    },
    "Python Control Flow": {
        "What does this list comprehension produce?": {
            "codeSnippet": "[x**2 for x in range(4) if x % 2 == 0]",
            "correctAnswer": "[0, 4]"
        }
    }
}"#;
