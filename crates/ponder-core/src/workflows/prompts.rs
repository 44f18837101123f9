//! Prompt templates for the built-in workflows

use crate::llm::LlmMessage;

pub(crate) fn translate(text: &str, critique: Option<&str>) -> Vec<LlmMessage> {
    let mut prompt = format!(
        "你是一名翻譯員，請將以下中文翻譯成英文，不須任何解釋：'{}'",
        text
    );
    if let Some(critique) = critique {
        prompt.push_str(&format!(
            "\n\n上一輪的審查意見是：{}。請根據意見修正翻譯。",
            critique
        ));
    }
    vec![LlmMessage::user(prompt)]
}

pub(crate) fn review_translation(original: &str, translation: &str) -> Vec<LlmMessage> {
    vec![LlmMessage::user(format!(
        "原文：{}\n翻譯：{}\n請檢查翻譯是否準確，若準確請回覆 PASS，否則請給出修正建議。",
        original, translation
    ))]
}

pub(crate) fn fast_reply(question: &str) -> Vec<LlmMessage> {
    vec![LlmMessage::user(question)]
}

pub(crate) fn expert_answer(question: &str) -> Vec<LlmMessage> {
    vec![LlmMessage::user(format!(
        "請以專業的角度回答以下問題：{}",
        question
    ))]
}

pub(crate) fn search_query(question: &str) -> Vec<LlmMessage> {
    vec![LlmMessage::user(format!(
        "根據問題 '{}'，生成一個具體的 Google 搜尋關鍵字以尋找答案。僅輸出關鍵字文字。",
        question
    ))]
}

pub(crate) fn plan(question: &str, collected: &str) -> Vec<LlmMessage> {
    vec![LlmMessage::user(format!(
        "使用者問題: {}\n\n目前收集的資訊:\n{}\n\n請判斷目前收集的資訊是否足以準確回答使用者的問題。\n\
         如果是，decision 輸出 'sufficient'。\n\
         如果否，decision 輸出 'insufficient' 以執行更多搜尋。",
        question, collected
    ))]
}

pub(crate) fn final_answer(question: &str, collected: &str) -> Vec<LlmMessage> {
    vec![LlmMessage::user(format!(
        "問題: {}\n\n已收集資訊:\n{}\n\n請提供一個全面且親切的回答給使用者。",
        question, collected
    ))]
}

pub(crate) fn tool_agent(question: &str) -> Vec<LlmMessage> {
    vec![LlmMessage::user(question)]
}

pub(crate) fn tool_summary(question: &str, observations: &str) -> Vec<LlmMessage> {
    vec![LlmMessage::user(format!(
        "問題: {}\n\n工具查詢結果:\n{}\n\n請根據以上結果直接回答使用者。",
        question, observations
    ))]
}

pub(crate) fn sentimental_post(topic: &str) -> Vec<LlmMessage> {
    vec![
        LlmMessage::system("你是一位充滿情感、語氣溫暖且富有感染力的社群小編。"),
        LlmMessage::user(format!(
            "請為主題「{}」寫一句話感性的貼文，著重於個人感受與情感連結，包含標籤。",
            topic
        )),
    ]
}

pub(crate) fn rational_post(topic: &str) -> Vec<LlmMessage> {
    vec![
        LlmMessage::system("你是一位專業、客觀且邏輯嚴謹的分析師。"),
        LlmMessage::user(format!(
            "請為主題「{}」寫一句理性的分析文，著重於事實、數據與邏輯推演，包含標籤。",
            topic
        )),
    ]
}
