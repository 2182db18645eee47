use super::{BundledAuthor, BundledPost};

pub static POSTS: [BundledPost; 5] = [
    BundledPost {
        id: "1",
        title: "设计的力量：如何通过简约提升用户体验",
        description: "探索极简主义设计原则如何影响现代数字产品设计，以及如何应用这些原则来提升用户体验。",
        content: r#"
# 设计的力量：如何通过简约提升用户体验

在当今信息过载的世界中，简约设计已经成为用户体验的关键。本文探讨了极简主义设计原则如何帮助创造更有效、更直观的数字产品。

## 简约设计的核心原则

1. **去除不必要的元素**：每个设计元素都应有明确的目的。
2. **关注内容**：设计应该服务于内容，而不是喧宾夺主。
3. **清晰的视觉层次**：通过大小、颜色和间距建立清晰的信息层次。
4. **一致性**：在整个产品中保持设计元素的一致性。

## 结论

在设计中追求简约并不意味着牺牲功能或表现力。相反，它是关于使用最少的元素实现最大的影响。通过拥抱简约设计原则，我们可以创造更清晰、更有效、更愉悦的用户体验。
"#,
        date: "2023-10-15",
        author: BundledAuthor {
            name: "陈明",
            avatar: Some(
                "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?ixlib=rb-1.2.1&auto=format&fit=facearea&facepad=2&w=256&h=256&q=80",
            ),
        },
        cover_image: "https://images.unsplash.com/photo-1488590528505-98d2b5aba04b?ixlib=rb-4.0.3&auto=format&fit=crop&w=2070&q=80",
        reading_time: "6 分钟",
        tags: &["设计", "用户体验", "极简主义"],
        featured: true,
    },
    BundledPost {
        id: "2",
        title: "人工智能如何改变内容创作",
        description: "探索AI工具如何帮助内容创作者提高效率、克服创作障碍并生成新的创意。",
        content: r#"
# 人工智能如何改变内容创作

人工智能正在重塑内容创作的方式，为创作者提供新工具和可能性。本文探讨了AI在内容创作中的应用及其影响。

## AI辅助创作工具的兴起

1. **文本生成**：可以根据简单提示生成完整段落或文章。
2. **风格润色**：帮助创作者统一语气并改进表达。
3. **创意激发**：在创作遇到瓶颈时提供新的方向。

## 结论

AI正在为内容创作带来革命性变化，但最终成功的创作仍然需要人类的创造力、情感和判断力。创作者需要学习如何有效地利用这些工具，将它们融入创作流程，创造出更具影响力的内容。
"#,
        date: "2023-11-05",
        author: BundledAuthor {
            name: "李思",
            avatar: Some(
                "https://images.unsplash.com/photo-1494790108377-be9c29b29330?ixlib=rb-1.2.1&auto=format&fit=facearea&facepad=2&w=256&h=256&q=80",
            ),
        },
        cover_image: "https://images.unsplash.com/photo-1649972904349-6e44c42644a7?ixlib=rb-4.0.3&auto=format&fit=crop&w=2070&q=80",
        reading_time: "8 分钟",
        tags: &["人工智能", "内容创作", "技术趋势"],
        featured: true,
    },
    BundledPost {
        id: "3",
        title: "远程工作的未来：挑战与机遇",
        description: "分析全球远程工作趋势，以及组织和个人如何适应这一工作方式的转变。",
        content: r#"
# 远程工作的未来：挑战与机遇

远程工作已从临时应对措施发展为许多行业的永久选择。本文探讨了这一转变带来的影响及未来发展趋势。

## 混合工作模式的兴起

越来越多的组织选择在办公室协作与远程专注之间取得平衡，让团队根据任务性质安排工作地点。

## 结论

远程工作不仅是暂时现象，而是工作未来的组成部分。通过认识其带来的机遇和挑战，组织和个人可以制定策略，最大化其潜在收益，创造更灵活、更包容的工作环境。
"#,
        date: "2023-12-10",
        author: BundledAuthor {
            name: "王建",
            avatar: Some(
                "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?ixlib=rb-1.2.1&auto=format&fit=facearea&facepad=2&w=256&h=256&q=80",
            ),
        },
        cover_image: "https://images.unsplash.com/photo-1486312338219-ce68d2c6f44d?ixlib=rb-4.0.3&auto=format&fit=crop&w=2070&q=80",
        reading_time: "7 分钟",
        tags: &["远程工作", "职场趋势", "数字化转型"],
        featured: false,
    },
    BundledPost {
        id: "4",
        title: "可持续技术：构建更环保的数字世界",
        description: "探讨科技产业如何减少环境影响，以及开发人员和公司可以采取的可持续实践。",
        content: r#"
# 可持续技术：构建更环保的数字世界

随着数字化的快速发展，科技产业的环境影响日益引起关注。本文探讨了技术与可持续发展的交叉点。

## 开发者的责任

* 编写高效的代码，减少不必要的计算。
* 选择使用可再生能源的数据中心。
* 延长软件可支持的硬件生命周期。

## 结论

构建可持续的数字世界需要技术人员、公司和用户的共同努力。通过将可持续性纳入技术创新和应用的各个方面，我们可以确保数字革命不仅为人类服务，也为地球服务。
"#,
        date: "2024-01-20",
        author: BundledAuthor {
            name: "赵雯",
            avatar: Some(
                "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?ixlib=rb-1.2.1&auto=format&fit=facearea&facepad=2&w=256&h=256&q=80",
            ),
        },
        cover_image: "https://images.unsplash.com/photo-1518770660439-4636190af475?ixlib=rb-4.0.3&auto=format&fit=crop&w=2070&q=80",
        reading_time: "9 分钟",
        tags: &["可持续发展", "绿色技术", "环保", "数字革命"],
        featured: false,
    },
    BundledPost {
        id: "5",
        title: "编程语言的演化：从过去到未来",
        description: "追溯编程语言的历史发展，并探讨影响其未来发展的趋势和因素。",
        content: r#"
# 编程语言的演化：从过去到未来

编程语言是技术世界的基础元素，随着计算需求的变化而不断发展。本文回顾了这一演化历程，并展望未来趋势。

## 当前趋势

1. **内存安全**：新语言越来越重视在编译期消除整类错误。
2. **并发友好**：语言层面的异步与并发原语成为标配。
3. **开发体验**：包管理、格式化与诊断工具成为语言的一部分。

## 结论

编程语言将继续演化以满足不断变化的技术需求。虽然新语言会不断涌现，但成熟语言的持久性也不应低估。无论未来如何发展，理解语言设计背后的原则和权衡将帮助开发者做出明智的技术选择。
"#,
        date: "2024-02-15",
        author: BundledAuthor {
            name: "张伟",
            avatar: Some(
                "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?ixlib=rb-1.2.1&auto=format&fit=facearea&facepad=2&w=256&h=256&q=80",
            ),
        },
        cover_image: "https://images.unsplash.com/photo-1461749280684-dccba630e2f6?ixlib=rb-4.0.3&auto=format&fit=crop&w=2070&q=80",
        reading_time: "10 分钟",
        tags: &["编程", "技术历史", "软件开发"],
        featured: false,
    },
];
