use std::fmt;

/// How a flower gets pollinated. Only the first three are taught.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pollination {
    Water,
    Bird,
    Insect,
    Wind,
}

impl Pollination {
    pub fn label(self) -> &'static str {
        match self {
            Pollination::Water => "수매화",
            Pollination::Bird => "조매화",
            Pollination::Insect => "충매화",
            Pollination::Wind => "풍매화",
        }
    }
}

impl fmt::Display for Pollination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug)]
pub struct QuizItem<L> {
    pub id: u32,
    pub name: &'static str,
    pub display_name: &'static str,
    pub expected: L,
    pub image_ref: &'static str,
    /// Shown in the feedback popup after a correct answer.
    pub explanation: &'static str,
}

#[derive(Debug)]
pub struct TestItem<L> {
    pub id: u32,
    pub name: &'static str,
    pub image_ref: &'static str,
    pub result: L,
    /// Deliberately answered wrong by the "trained" model.
    pub is_trick: bool,
}

/// Every fixed text and answer key a labeling lesson needs.
#[derive(Debug)]
pub struct LessonScript<L: 'static> {
    pub title: &'static str,
    pub intro_title: &'static str,
    pub intro: &'static [&'static str],
    pub selection_prompt: &'static str,
    pub choices: &'static [L],
    pub quiz: &'static [QuizItem<L>],
    pub correct_title: &'static str,
    pub retry_title: &'static str,
    pub retry_text: &'static str,
    pub training_text: &'static str,
    pub trained_title: &'static str,
    pub trained_text: &'static str,
    pub test_prompt: &'static str,
    pub test_items: &'static [TestItem<L>],
    pub error_title: &'static str,
    pub error_text: &'static str,
    pub summary_title: &'static str,
    pub summary: &'static [&'static str],
}

impl<L: 'static> LessonScript<L> {
    pub fn test_item(&self, id: u32) -> Option<&TestItem<L>> {
        self.test_items.iter().find(|item| item.id == id)
    }
}

pub static FLOWER_LESSON: LessonScript<Pollination> = LessonScript {
    title: "배운 것만 말해요",
    intro_title: "시작하기",
    intro: &[
        "이번 시간에는 식물이 씨를 퍼트리는 방법을\n인공지능에게 학습시켜 봅시다.",
        "인공지능을 학습시키려면 데이터에 이름을 정확히 붙여줘야 합니다.\n이것을 라벨링이라고 해요.",
        "꽃을 보고 해당 꽃이 씨를 어떻게 퍼트리는지\n알맞게 라벨링 해주세요.",
        "인공지능이 학습을 완료하고 나면 꽃 사진을 선택했을 때\n씨를 어떻게 퍼트리는지 인공지능이 알려줍니다.",
        "이제 꽃이 씨를 퍼트리는 방법을 분류해 주는\n인공지능을 만들어 봅시다.",
    ],
    selection_prompt: "이 꽃이 씨를 퍼트리는 방법을 선택하세요.",
    choices: &[Pollination::Water, Pollination::Bird, Pollination::Insect],
    quiz: &[
        QuizItem {
            id: 1,
            name: "lotus",
            display_name: "연꽃",
            expected: Pollination::Water,
            image_ref: "images/lotus.jpeg",
            explanation: "물로 꽃가루받이가 이루어지는 꽃으로 연꽃, 수련, 나사말 등이 있습니다.",
        },
        QuizItem {
            id: 2,
            name: "forsythia",
            display_name: "개나리",
            expected: Pollination::Insect,
            image_ref: "images/forsythia.jpeg",
            explanation: "곤충을 유인하기 위해 꽃잎이 화려하고 냄새가 강한 것이 특징입니다.",
        },
        QuizItem {
            id: 3,
            name: "camellia",
            display_name: "동백꽃",
            expected: Pollination::Bird,
            image_ref: "images/camellia.png",
            explanation: "새의 눈이 빨간색과 분홍색을 유난히 잘보기 때문에 빨간색과 분홍색 꽃이 많습니다.",
        },
    ],
    correct_title: "정답입니다!",
    retry_title: "다시 한 번 생각해 보세요.",
    retry_text: "잘못된 라벨링은 인공지능이 잘못된 학습을 하게 됩니다.",
    training_text: "이제 인공지능이 학습을 시작합니다.",
    trained_title: "인공지능 학습완료!",
    trained_text: "이제 꽃이 씨를 퍼트리는 방법을 인공지능이 알려줍니다.",
    test_prompt: "이미지를 끌고오면 인공지능이 해당 꽃이 씨를 퍼트리는 방법을 알려줍니다.",
    test_items: &[
        TestItem {
            id: 1,
            name: "민들레",
            image_ref: "images/dandelion.jpeg",
            // Dandelions are wind-pollinated, which the model never saw.
            result: Pollination::Water,
            is_trick: true,
        },
        TestItem {
            id: 2,
            name: "개나리",
            image_ref: "images/forsythia-yellow.jpeg",
            result: Pollination::Insect,
            is_trick: false,
        },
    ],
    error_title: "인공지능이 틀렸어요!",
    error_text: "민들레는 풍매화예요. 인공지능은 왜 수매화라고 답했을까요?",
    summary_title: "정리하기",
    summary: &[
        "인공지능을 학습 시키기 위해서는\n학습 데이터와 데이터에 맞는 이름을 매칭시키는 라벨링이 필요해요.",
        "라벨링을 하고 나면\n인공지능이 학습을 할 수 있습니다.",
        "학습이 완료되고 나면 테스트를 통해\n인공지능이 얼마나 똑똑한지 확인할 수 있어요.",
        "그런데 인공지능은 배운 것만 말할 수 있어요.\n민들레는 풍매화지만 인공지능에게 풍매화는 학습 시키지 않았기 때문에\n배운 것 중에 하나를 말하게 됩니다.",
        "인공지능은 반드시 배운 것만 말해요.\n잘못 배우면 잘못된 답을 내놓게 됩니다.",
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flower_lesson_has_five_steps_each_side() {
        assert_eq!(FLOWER_LESSON.intro.len(), 5);
        assert_eq!(FLOWER_LESSON.summary.len(), 5);
    }

    #[test]
    fn test_every_expected_label_is_a_choice() {
        for item in FLOWER_LESSON.quiz {
            assert!(FLOWER_LESSON.choices.contains(&item.expected), "{}", item.name);
        }
    }

    #[test]
    fn test_exactly_one_trick_item_answers_with_a_trained_label() {
        let tricks: Vec<_> = FLOWER_LESSON
            .test_items
            .iter()
            .filter(|item| item.is_trick)
            .collect();
        assert_eq!(tricks.len(), 1);
        assert!(FLOWER_LESSON.choices.contains(&tricks[0].result));
    }

    #[test]
    fn test_test_item_lookup() {
        assert_eq!(FLOWER_LESSON.test_item(2).map(|i| i.name), Some("개나리"));
        assert!(FLOWER_LESSON.test_item(99).is_none());
    }
}
