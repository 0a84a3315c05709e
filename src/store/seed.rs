//! Built-in course catalog.
//!
//! Seeded in newest-first order; the catalog treats that order as the
//! "newest" sort.

use super::catalog::{Course, Difficulty, Lesson, LessonKind, Module, Review};

fn lesson(id: &str, title: &str, duration: &str, kind: LessonKind) -> Lesson {
    Lesson {
        id: id.to_string(),
        title: title.to_string(),
        duration: duration.to_string(),
        kind,
    }
}

fn module(id: &str, title: &str, lessons: Vec<Lesson>) -> Module {
    Module {
        id: id.to_string(),
        title: title.to_string(),
        lessons,
    }
}

fn review(rating: u8, comment: &str, date: &str) -> Review {
    Review {
        rating,
        comment: comment.to_string(),
        date: date.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn course(
    id: &str,
    slug: &str,
    title: &str,
    description: &str,
    price_eth: f64,
    rating: f64,
    students: u64,
    category: &str,
    difficulty: Difficulty,
    modules: Vec<Module>,
    reviews: Vec<Review>,
    created_at: &str,
) -> Course {
    Course {
        id: id.to_string(),
        slug: slug.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        price_eth,
        rating,
        students,
        category: category.to_string(),
        difficulty,
        modules,
        reviews,
        created_at: created_at.to_string(),
    }
}

/// The built-in course set shipped with the platform.
pub fn seed_courses() -> Vec<Course> {
    vec![
        course(
            "8",
            "dao-governance-in-practice",
            "DAO Governance in Practice",
            "Proposal lifecycles, voting strategies, and treasury management for decentralized organizations.",
            0.08,
            4.4,
            980,
            "blockchain",
            Difficulty::Advanced,
            vec![
                module(
                    "m1",
                    "Governance Models",
                    vec![
                        lesson("l1", "Token voting and its failure modes", "18:40", LessonKind::Video),
                        lesson("l2", "Quadratic and conviction voting", "15:10", LessonKind::Video),
                        lesson("l3", "Governance models quiz", "10:00", LessonKind::Quiz),
                    ],
                ),
                module(
                    "m2",
                    "Running a DAO",
                    vec![
                        lesson("l4", "Writing an on-chain proposal", "22:05", LessonKind::Exercise),
                        lesson("l5", "Treasury diversification", "14:30", LessonKind::Video),
                    ],
                ),
            ],
            vec![review(4, "Dense but worth it.", "2025-05-12T00:00:00Z")],
            "2025-04-20T09:00:00Z",
        ),
        course(
            "7",
            "zero-knowledge-proofs-primer",
            "Zero-Knowledge Proofs Primer",
            "An intuition-first tour of zk-SNARKs and zk-STARKs and where rollups actually use them.",
            0.12,
            4.8,
            1430,
            "security",
            Difficulty::Advanced,
            vec![
                module(
                    "m1",
                    "Foundations",
                    vec![
                        lesson("l1", "What a proof system promises", "16:20", LessonKind::Video),
                        lesson("l2", "Interactive to non-interactive", "19:45", LessonKind::Video),
                        lesson("l3", "Foundations quiz", "08:00", LessonKind::Quiz),
                    ],
                ),
            ],
            vec![review(5, "Finally an explanation that sticks.", "2025-04-02T00:00:00Z")],
            "2025-03-11T09:00:00Z",
        ),
        course(
            "6",
            "crypto-trading-technical-analysis",
            "Crypto Trading and Technical Analysis",
            "Chart patterns, risk management, and the market microstructure of 24/7 exchanges.",
            0.06,
            3.9,
            5120,
            "trading",
            Difficulty::Intermediate,
            vec![
                module(
                    "m1",
                    "Reading the Market",
                    vec![
                        lesson("l1", "Candlesticks and volume", "13:15", LessonKind::Video),
                        lesson("l2", "Support, resistance, liquidity", "17:50", LessonKind::Video),
                        lesson("l3", "Paper-trade a setup", "25:00", LessonKind::Exercise),
                    ],
                ),
            ],
            vec![
                review(4, "Good risk management section.", "2025-02-18T00:00:00Z"),
                review(3, "Wanted more on derivatives.", "2025-03-01T00:00:00Z"),
            ],
            "2025-01-28T09:00:00Z",
        ),
        course(
            "5",
            "web3-frontend-development",
            "Web3 Frontend Development",
            "Connect wallets, read contract state, and build dapp UIs that survive chain reorgs.",
            0.1,
            4.6,
            2890,
            "development",
            Difficulty::Intermediate,
            vec![
                module(
                    "m1",
                    "Wallet Integration",
                    vec![
                        lesson("l1", "Providers and signers", "14:00", LessonKind::Video),
                        lesson("l2", "Connect flow UX", "11:25", LessonKind::Video),
                        lesson("l3", "Build a connect button", "30:00", LessonKind::Exercise),
                    ],
                ),
                module(
                    "m2",
                    "Reading Chain State",
                    vec![
                        lesson("l4", "Polling vs subscriptions", "12:40", LessonKind::Video),
                        lesson("l5", "Chain state quiz", "09:00", LessonKind::Quiz),
                    ],
                ),
            ],
            vec![review(5, "The reorg handling chapter saved my project.", "2025-01-22T00:00:00Z")],
            "2024-12-15T09:00:00Z",
        ),
        course(
            "4",
            "nft-creation-and-marketplaces",
            "NFT Creation and Marketplaces",
            "Metadata standards, minting flows, royalties, and listing on open marketplaces.",
            0.05,
            4.1,
            3750,
            "nft",
            Difficulty::Beginner,
            vec![
                module(
                    "m1",
                    "Minting Basics",
                    vec![
                        lesson("l1", "Token metadata that renders", "10:35", LessonKind::Video),
                        lesson("l2", "Mint your first token", "20:00", LessonKind::Exercise),
                        lesson("l3", "Metadata quiz", "07:30", LessonKind::Quiz),
                    ],
                ),
            ],
            vec![review(4, "Clear and practical.", "2024-12-05T00:00:00Z")],
            "2024-11-19T09:00:00Z",
        ),
        course(
            "3",
            "defi-deep-dive",
            "DeFi: Decentralized Finance Deep Dive",
            "AMMs, lending markets, stablecoins, and yield strategies, with the exploits that shaped them.",
            0.15,
            4.7,
            4210,
            "defi",
            Difficulty::Advanced,
            vec![
                module(
                    "m1",
                    "Automated Market Makers",
                    vec![
                        lesson("l1", "Constant product math", "16:45", LessonKind::Video),
                        lesson("l2", "Impermanent loss", "13:20", LessonKind::Video),
                        lesson("l3", "AMM quiz", "09:00", LessonKind::Quiz),
                    ],
                ),
                module(
                    "m2",
                    "Lending and Yield",
                    vec![
                        lesson("l4", "Overcollateralized lending", "18:10", LessonKind::Video),
                        lesson("l5", "Simulate a yield strategy", "35:00", LessonKind::Exercise),
                    ],
                ),
            ],
            vec![
                review(5, "Best DeFi material I have found.", "2024-11-30T00:00:00Z"),
                review(4, "Exploit case studies are gold.", "2024-12-14T00:00:00Z"),
            ],
            "2024-10-07T09:00:00Z",
        ),
        course(
            "2",
            "smart-contract-development-solidity",
            "Smart Contract Development with Solidity",
            "Write, test, and deploy Solidity contracts, from ERC-20 basics to upgrade patterns.",
            0.2,
            4.5,
            6340,
            "development",
            Difficulty::Intermediate,
            vec![
                module(
                    "m1",
                    "Solidity Fundamentals",
                    vec![
                        lesson("l1", "Types, storage, and gas", "15:30", LessonKind::Video),
                        lesson("l2", "Functions and modifiers", "14:05", LessonKind::Video),
                        lesson("l3", "Write an ERC-20", "40:00", LessonKind::Exercise),
                    ],
                ),
                module(
                    "m2",
                    "Testing and Deployment",
                    vec![
                        lesson("l4", "Unit testing contracts", "19:25", LessonKind::Video),
                        lesson("l5", "Deployment quiz", "10:00", LessonKind::Quiz),
                    ],
                ),
            ],
            vec![review(5, "The exercises are the best part.", "2024-10-20T00:00:00Z")],
            "2024-09-02T09:00:00Z",
        ),
        course(
            "1",
            "blockchain-fundamentals",
            "Blockchain Fundamentals",
            "How blocks, hashes, and consensus fit together. No prior crypto knowledge required.",
            0.0,
            4.3,
            8920,
            "blockchain",
            Difficulty::Beginner,
            vec![
                module(
                    "m1",
                    "Core Concepts",
                    vec![
                        lesson("l1", "What a blockchain is", "09:50", LessonKind::Video),
                        lesson("l2", "Hashing and immutability", "12:15", LessonKind::Video),
                        lesson("l3", "Consensus mechanisms", "16:30", LessonKind::Video),
                        lesson("l4", "Core concepts quiz", "08:00", LessonKind::Quiz),
                    ],
                ),
                module(
                    "m2",
                    "Using a Chain",
                    vec![
                        lesson("l5", "Wallets and keys", "11:40", LessonKind::Video),
                        lesson("l6", "Send a testnet transaction", "20:00", LessonKind::Exercise),
                    ],
                ),
            ],
            vec![
                review(5, "Perfect starting point.", "2024-09-10T00:00:00Z"),
                review(4, "Wish it covered rollups.", "2024-10-02T00:00:00Z"),
            ],
            "2024-08-14T09:00:00Z",
        ),
    ]
}
