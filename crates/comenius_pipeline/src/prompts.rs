//! Prompt construction for the three generation stages.
//!
//! Each builder produces a Chinese instruction block that pins the
//! heading grammar [`outline`](crate::outline) parses.  Context grows
//! stage by stage: the chapter prompt sees only the topic, the section
//! and content prompts also see a titles-only snapshot of everything
//! generated so far.

use comenius_core::{Chapter, Section};

/// Placeholder injected when no web search ran or it produced nothing.
pub const NO_WEB_CONTEXT: &str = "未开启联网功能";

/// Placeholder injected when the outline snapshot is still empty.
pub const NO_CONTEXT: &str = "暂无";

fn web_block(web_context: Option<&str>) -> &str {
    match web_context {
        Some(text) if !text.trim().is_empty() => text,
        _ => NO_WEB_CONTEXT,
    }
}

fn context_block(context: &str) -> &str {
    if context.trim().is_empty() {
        NO_CONTEXT
    } else {
        context
    }
}

/// Stage one: ask for the chapter outline of a topic.
pub fn chapter_outline(topic: &str, web_context: Option<&str>) -> String {
    let web = web_block(web_context);
    format!(
        "你是一个专业的教育内容编辑。请为主题【{topic}】生成主要章节大纲。\n\
         \n\
         要求：\n\
         1. 根据主题复杂度合理安排章节数量（通常5-12个主要章节），\
         每章代表一个完整的知识模块，内部再细分小节，不要在章节层面具体化。\n\
         2. 章节之间逻辑关联、由浅入深，新知识建立在已学内容之上。\n\
         3. 格式规范，严格按照以下格式输出，禁止使用`或```包裹内容：\n\
         # 第n章 标题\n\
         <章节描述内容>\n\
         4. 章节描述用<>括起来，说明本章核心概念、学习目标、\
         与前后章节的衔接以及难点重点。\n\
         \n\
         示例：\n\
         # 第1章 基础定义\n\
         <本章介绍基本概念和核心定义，帮助读者建立基础认知。>\n\
         # 第2章 简单公式\n\
         <本章探讨基本公式的应用和推导过程。>\n\
         \n\
         联网搜索结果：\n\
         {web}\n\
         \n\
         请直接开始输出大纲："
    )
}

/// Stage two: ask for the section outline of one chapter.
pub fn section_outline(
    topic: &str,
    chapter: &Chapter,
    context: &str,
    web_context: Option<&str>,
) -> String {
    let chapter_title = &chapter.title;
    let description = &chapter.description;
    let number = chapter.number;
    let context = context_block(context);
    let web = web_block(web_context);
    format!(
        "你是一个专业的教学大纲编辑。请为主题【{topic}】的章节【{chapter_title}】生成小节大纲。\n\
         \n\
         章节描述：{description}\n\
         \n\
         规则：\n\
         1. 4-6个小节，循序渐进，只覆盖本章主题范围，\
         不得包含已生成目录中其他章节的内容。\n\
         2. 每个小节必须包含标题和描述，描述概括主要知识模块与学习目标。\n\
         3. 格式要求非常严格，必须完全按照以下格式，禁止使用`或```包裹内容：\n\
         ## 章节号.小节号 标题\n\
         <小节描述内容>\n\
         4. 小节必须以\"## \"开头，章节号必须正确\
         （第{number}章就是{number}.1、{number}.2等）。\n\
         \n\
         示例：\n\
         ## {number}.1 基础概念与原理\n\
         <本小节介绍核心概念和基本原理，建立知识框架。>\n\
         ## {number}.2 方法与技巧\n\
         <本小节讲解实用方法和重要技巧。>\n\
         \n\
         当前已生成的目录：\n\
         {context}\n\
         \n\
         联网搜索结果：\n\
         {web}\n\
         \n\
         请直接按格式输出小节（不要加任何说明）："
    )
}

/// Stage three: ask for the full prose of one section.
pub fn section_content(
    topic: &str,
    section: &Section,
    context: &str,
    web_context: Option<&str>,
) -> String {
    let number = &section.number;
    let title = &section.title;
    let description = &section.description;
    let context = context_block(context);
    let web = web_block(web_context);
    format!(
        "请为【{topic}】的小节【{number} {title}】生成详细内容。\n\
         \n\
         小节描述：{description}\n\
         \n\
         内容结构：\n\
         1. 小节标题作为一级标题并携带编号（# {number} {title}），\
         次小节作为二级标题并携带编号（## {number}.1、## {number}.2等），\
         按知识点划分，每个知识点独立讲解并力求详尽。\n\
         2. 概念讲解用通俗易懂的语言，结合生活化的类比和具体实例；\
         引入术语时立即解释；推导分步骤展示。\n\
         3. 结尾给出要点总结和扩展阅读建议。\n\
         \n\
         格式要求：\n\
         - 使用markdown格式，重要概念用**加粗**标记。\n\
         - 数学公式使用$$包裹，如$$E=mc^2$$，并解释每个符号的含义。\n\
         - 禁止用`或```包裹非代码内容；非代码主题禁止使用代码块。\n\
         \n\
         当前已生成的目录：\n\
         {context}\n\
         \n\
         联网搜索结果：\n\
         {web}\n\
         \n\
         请直接输出正文："
    )
}
