use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Rock = 0,
    Paper = 1,
    Scissors = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
    Tie,
}

impl Hand {
    pub const ALL: [Hand; 3] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    pub fn name(self) -> &'static str {
        match self {
            Hand::Rock => "Rock",
            Hand::Paper => "Paper",
            Hand::Scissors => "Scissors",
        }
    }

    pub fn random(rng: &mut impl Rng) -> Hand {
        Hand::ALL[rng.random_range(0..3)]
    }

    /// Outcome from the point of view of `self` playing against `other`.
    ///
    /// Each hand loses to the one encoded right after it, modulo 3.
    pub fn play(self, other: Hand) -> Outcome {
        let (player, computer) = (self as u8, other as u8);

        if player == computer {
            Outcome::Tie
        } else if (player + 1) % 3 == computer {
            Outcome::Lose
        } else {
            Outcome::Win
        }
    }

    pub fn describe(self, computer: Hand) -> String {
        match self.play(computer) {
            Outcome::Win => format!("You won! `{}` beats `{}`", self.name(), computer.name()),
            Outcome::Lose => format!("You lost! `{}` beats `{}`", computer.name(), self.name()),
            Outcome::Tie => format!("You tied! Both chose `{}`", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Hand::*;

    #[test]
    fn all_nine_combinations() {
        let table = [
            (Rock, Rock, Outcome::Tie),
            (Rock, Paper, Outcome::Lose),
            (Rock, Scissors, Outcome::Win),
            (Paper, Rock, Outcome::Win),
            (Paper, Paper, Outcome::Tie),
            (Paper, Scissors, Outcome::Lose),
            (Scissors, Rock, Outcome::Lose),
            (Scissors, Paper, Outcome::Win),
            (Scissors, Scissors, Outcome::Tie),
        ];

        for (player, computer, expected) in table {
            assert_eq!(player.play(computer), expected, "{:?} vs {:?}", player, computer);
        }

        let count = |outcome| {
            Hand::ALL
                .iter()
                .flat_map(|p| Hand::ALL.iter().map(move |c| p.play(*c)))
                .filter(|o| *o == outcome)
                .count()
        };
        assert_eq!(count(Outcome::Win), 3);
        assert_eq!(count(Outcome::Lose), 3);
        assert_eq!(count(Outcome::Tie), 3);
    }

    #[test]
    fn descriptions() {
        assert_eq!(Rock.describe(Scissors), "You won! `Rock` beats `Scissors`");
        assert_eq!(Rock.describe(Paper), "You lost! `Paper` beats `Rock`");
        assert_eq!(Paper.describe(Paper), "You tied! Both chose `Paper`");
    }

    #[test]
    fn random_hand_is_valid() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            assert!(Hand::ALL.contains(&Hand::random(&mut rng)));
        }
    }
}
