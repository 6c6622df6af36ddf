//! Probabilistic ambient responder for group chats.
//!
//! For messages that did not address the bot, a fixed ordered table of
//! question-like patterns decides whether to chime in with a canned reply.
//! Each pattern carries its own base probability; an environment override
//! can force a single probability for every pattern. Independent of the
//! model-driven reply path.

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use tracing::debug;

struct ReplyPattern {
    name: &'static str,
    pattern: Regex,
    replies: &'static [&'static str],
    probability: f64,
}

fn pattern(name: &'static str, re: &str, replies: &'static [&'static str], probability: f64) -> ReplyPattern {
    ReplyPattern {
        name,
        pattern: Regex::new(re).expect("static talkative pattern must compile"),
        replies,
        probability,
    }
}

fn default_patterns() -> Vec<ReplyPattern> {
    vec![
        pattern(
            "foo是bar吗？",
            r"是.*?[吗吧嘛][？?]?$",
            &[
                "是的呢～",
                "当然啦！",
                "嗯嗯，没错",
                "应该是吧...",
                "你说得对！",
                "确实如此",
                "是这样的～",
                "不是哦",
                "好像不是",
                "可能不是吧...",
                "不太可能是",
                "不见得呢～",
                "说不准呢",
                "看情况吧",
                "见仁见智",
                "不知道哦～",
                "我也不清楚",
            ],
            0.25,
        ),
        pattern(
            "有foo吗？",
            r"有.+[吗吧嘛][？?]?$",
            &[
                "有的哦～",
                "当然有啦！",
                "应该有吧...",
                "肯定有的！",
                "嗯嗯，有的",
                "当然～",
                "没有哦",
                "好像没有",
                "可能没有吧...",
                "不太可能有",
                "说不准呢",
                "看情况吧",
                "不知道哦～",
                "我也不清楚",
            ],
            0.2,
        ),
        pattern(
            "看看foo",
            r"看看.+",
            &[
                "👀 让我康康...",
                "好的，我看看～",
                "👁️ 瞧瞧",
                "🔍 我来看看",
                "让我瞅瞅",
                "👁️‍🗨️ 看看看",
            ],
            0.2,
        ),
        pattern(
            "是不是foo",
            r"是不是.+$",
            &[
                "应该是的吧",
                "嗯嗯，是的",
                "好像是这样",
                "确实是呢",
                "没错哦～",
                "你说得对",
                "不太像吧",
                "好像不是",
                "可能不是哦",
                "不见得呢～",
                "未必哦",
                "说不准呢",
                "看情况吧",
                "见仁见智",
                "不知道哦～",
                "我也不清楚",
            ],
            0.25,
        ),
        pattern(
            "foo真的假的?",
            r"真的假的[？?]?$",
            &[
                "当然是真的啦！",
                "假的，骗你的～",
                "你猜猜看",
                "半真半假吧",
                "这个... 保密～",
            ],
            0.3,
        ),
        pattern(
            "foo好bar吗？",
            r"好.*?(吗|嘛)[？?]?$",
            &[
                "好呀好呀！",
                "当然好啦～",
                "挺好的",
                "还不错哦",
                "非常好！",
                "超级好的～",
                "没那么好",
                "一般般吧",
                "不太好",
                "不怎么样",
                "有点失望",
                "还行吧",
                "看情况",
                "因人而异",
                "见仁见智",
                "各有各的好",
            ],
            0.2,
        ),
        pattern(
            "为什么",
            r"为什么.+$",
            &[
                "因为... 就是因为！",
                "这个问题很深奥呢",
                "🤔 让我想想... 想不出来 😵",
                "可能是缘分吧",
                "谁知道呢～",
                "这就是生活啊",
            ],
            0.15,
        ),
    ]
}

/// Pattern-table responder with an optional global probability override.
pub struct TalkativeResponder {
    patterns: Vec<ReplyPattern>,
    mention: Regex,
    override_probability: Option<f64>,
}

impl TalkativeResponder {
    /// `override_probability` in `0.0..=1.0` forces every pattern to that
    /// probability; `None` keeps per-pattern defaults.
    pub fn new(override_probability: Option<f64>) -> Self {
        Self {
            patterns: default_patterns(),
            mention: Regex::new(r"@\w+").expect("static mention pattern must compile"),
            override_probability,
        }
    }

    /// Decides whether to reply to unaddressed group text. Patterns are
    /// tried in table order; the first match rolls the dice, a miss falls
    /// through to the next pattern.
    pub fn should_reply<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Option<String> {
        let clean = self.mention.replace_all(text, "");
        let clean = clean.trim();

        for p in &self.patterns {
            if !p.pattern.is_match(clean) {
                continue;
            }
            let probability = self.override_probability.unwrap_or(p.probability);
            let roll: f64 = rng.gen();
            let wants_reply = roll < probability;
            debug!(
                pattern = p.name,
                roll, probability, wants_reply, "talkative pattern matched"
            );
            if wants_reply {
                return p.replies.choose(rng).map(|s| s.to_string());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn forced_probability_one_always_replies_from_candidates() {
        let responder = TalkativeResponder::new(Some(1.0));
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let reply = responder
                .should_reply("你是不是在开玩笑？", &mut rng)
                .expect("probability 1.0 must reply");
            let candidates = &responder.patterns[3].replies;
            assert!(candidates.contains(&reply.as_str()));
        }
    }

    #[test]
    fn forced_probability_zero_never_replies() {
        let responder = TalkativeResponder::new(Some(0.0));
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert!(responder.should_reply("你是不是在开玩笑？", &mut rng).is_none());
        }
    }

    #[test]
    fn unmatched_text_never_replies() {
        let responder = TalkativeResponder::new(Some(1.0));
        assert!(responder.should_reply("just a plain sentence", &mut rng()).is_none());
    }

    #[test]
    fn mentions_are_stripped_before_matching() {
        let responder = TalkativeResponder::new(Some(1.0));
        // The pattern is anchored at end of text; the trailing mention would
        // break the match if it were not stripped.
        assert!(responder
            .should_reply("这个真的假的？ @some_bot", &mut rng())
            .is_some());
    }

    #[test]
    fn question_mark_is_optional() {
        let responder = TalkativeResponder::new(Some(1.0));
        assert!(responder.should_reply("今天有雨吗", &mut rng()).is_some());
    }
}
