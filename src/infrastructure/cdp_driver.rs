//! CDP UI 驱动 - 基础设施层
//!
//! 通过 Chrome DevTools 协议驱动网页 / WebView 形式的工具台。
//! 控件按 ARIA 角色 + 可访问名称查找，找到后打上 `data-automation-handle` 标记，
//! 之后的操作都通过这个标记引用控件。

use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::json;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use super::js_executor::JsExecutor;
use super::ui_driver::{Handle, Role, Selector, TitleMatch, UiDriver};

/// 轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 基于 CDP 的 UI 驱动
pub struct CdpDriver {
    executor: JsExecutor,
    start_url: Option<String>,
    load_timeout: Duration,
    /// 会话内剪贴板，粘贴后即被消费
    clipboard: Option<String>,
}

impl CdpDriver {
    pub fn new(executor: JsExecutor, start_url: Option<String>, load_timeout: Duration) -> Self {
        Self {
            executor,
            start_url,
            load_timeout,
            clipboard: None,
        }
    }

    async fn find(&self, selector: &Selector, visible_only: bool) -> Option<Handle> {
        match self
            .executor
            .eval_as::<Option<String>>(locate_script(selector, visible_only))
            .await
        {
            Ok(found) => found.map(Handle),
            Err(e) => {
                debug!("查找控件 {} 时脚本出错: {}", selector, e);
                None
            }
        }
    }

    async fn run_action(&self, handle: &Handle, body: &str, action: &str) -> Result<()> {
        let ok: bool = self.executor.eval_as(action_script(handle, body)).await?;
        if !ok {
            bail!("{} 失败: 控件 {} 已不存在", action, handle);
        }
        Ok(())
    }

    async fn page_ready(&self) -> bool {
        self.executor
            .eval_as::<bool>(READY_SCRIPT)
            .await
            .unwrap_or(false)
    }
}

#[async_trait]
impl UiDriver for CdpDriver {
    async fn locate(&mut self, selector: &Selector) -> Option<Handle> {
        self.find(selector, false).await
    }

    async fn locate_all(&mut self, role: Role) -> Vec<Handle> {
        match self
            .executor
            .eval_as::<Vec<String>>(locate_all_script(role))
            .await
        {
            Ok(handles) => handles.into_iter().map(Handle).collect(),
            Err(e) => {
                debug!("列出 {} 控件时脚本出错: {}", role, e);
                Vec::new()
            }
        }
    }

    async fn exists(&mut self, handle: &Handle) -> bool {
        self.executor
            .eval_as::<bool>(format!("!!{}", element_expr(handle)))
            .await
            .unwrap_or(false)
    }

    async fn click(&mut self, handle: &Handle) -> Result<()> {
        self.run_action(
            handle,
            "el.scrollIntoView({ block: 'center' }); el.focus(); el.click();",
            "点击",
        )
        .await
    }

    async fn set_text(&mut self, handle: &Handle, text: &str) -> Result<()> {
        let body = format!("{} setValue(el, {});", SET_VALUE_FN, json!(text));
        self.run_action(handle, &body, "设置文本").await
    }

    async fn write_clipboard(&mut self, text: &str) -> Result<()> {
        if self.clipboard.is_some() {
            warn!("上一次写入剪贴板的内容尚未粘贴，将被覆盖");
        }
        self.clipboard = Some(text.to_string());
        Ok(())
    }

    async fn send_paste(&mut self, handle: &Handle) -> Result<()> {
        let Some(text) = self.clipboard.take() else {
            bail!("剪贴板为空，无法粘贴");
        };
        let body = format!(
            r#"{set_value}
            const text = {text};
            const dt = new DataTransfer();
            dt.setData('text/plain', text);
            const evt = new ClipboardEvent('paste', {{ clipboardData: dt, bubbles: true, cancelable: true }});
            if (el.dispatchEvent(evt)) {{
                setValue(el, (el.isContentEditable ? el.textContent : el.value) + text);
            }}"#,
            set_value = SET_VALUE_FN,
            text = json!(text)
        );
        self.run_action(handle, &body, "粘贴").await
    }

    async fn send_enter(&mut self, handle: &Handle) -> Result<()> {
        let body = r#"
            for (const type of ['keydown', 'keypress', 'keyup']) {
                el.dispatchEvent(new KeyboardEvent(type, { key: 'Enter', code: 'Enter', keyCode: 13, bubbles: true }));
            }
            const isDialog = el.matches('dialog, [role=dialog], [role=alertdialog]');
            if (isDialog) {
                const button = el.querySelector('button[type=submit], [data-default], .primary, button');
                if (button) button.click();
            }"#;
        self.run_action(handle, body, "回车").await
    }

    async fn wait_ready(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page_ready().await {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_visible(&mut self, selector: &Selector, timeout: Duration) -> Option<Handle> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(handle) = self.find(selector, true).await {
                return Some(handle);
            }
            if Instant::now() >= deadline {
                return None;
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn reset_to_known_state(&mut self) -> bool {
        self.clipboard = None;
        let navigated = match &self.start_url {
            Some(url) => self.executor.goto(url).await,
            None => self.executor.reload().await,
        };
        if let Err(e) = navigated {
            warn!("恢复起始页面失败: {}", e);
            return false;
        }
        let timeout = self.load_timeout;
        self.wait_ready(timeout).await
    }
}

// ========== 脚本构造 ==========

const READY_SCRIPT: &str = r#"document.readyState === 'complete' && !document.querySelector('[aria-busy="true"]')"#;

const SET_VALUE_FN: &str = r#"
    const setValue = (el, value) => {
        if (el.isContentEditable) {
            el.textContent = value;
        } else {
            const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype;
            Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, value);
        }
        el.dispatchEvent(new Event('input', { bubbles: true }));
        el.dispatchEvent(new Event('change', { bubbles: true }));
    };"#;

/// 角色对应的 CSS 选择器
fn role_css(role: Role) -> &'static str {
    match role {
        Role::Edit => "input:not([type=button]):not([type=submit]):not([type=checkbox]), textarea, [contenteditable=true], [role=textbox], [role=searchbox]",
        Role::Button => "button, [role=button], input[type=button], input[type=submit]",
        Role::Hyperlink => "a, [role=link]",
        Role::Dialog => "dialog, [role=dialog], [role=alertdialog]",
        Role::ListItem => "li, [role=option], [role=listitem], [role=menuitem]",
        Role::CheckBox => "input[type=checkbox], [role=checkbox]",
    }
}

fn element_expr(handle: &Handle) -> String {
    format!(
        "document.querySelector('[data-automation-handle=\"' + {} + '\"]')",
        json!(handle.0)
    )
}

fn action_script(handle: &Handle, body: &str) -> String {
    format!(
        r#"(() => {{
            const el = {element};
            if (!el) return false;
            {body}
            return true;
        }})()"#,
        element = element_expr(handle),
        body = body
    )
}

const TAG_FN: &str = r#"
    const visible = (el) => !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);
    const tag = (el) => {
        if (!el.dataset.automationHandle) {
            window.__automationSeq = (window.__automationSeq || 0) + 1;
            el.dataset.automationHandle = String(window.__automationSeq);
        }
        return el.dataset.automationHandle;
    };"#;

fn locate_script(selector: &Selector, visible_only: bool) -> String {
    let matcher = match &selector.title {
        TitleMatch::Exact(title) => json!({ "kind": "exact", "value": title }),
        TitleMatch::Pattern(pattern) => json!({ "kind": "pattern", "value": pattern }),
    };
    format!(
        r#"(() => {{
            {tag_fn}
            const matcher = {matcher};
            const visibleOnly = {visible_only};
            const test = matcher.kind === 'exact'
                ? (t) => t.trim() === matcher.value.trim()
                : ((re) => (t) => re.test(t))(new RegExp(matcher.value));
            const names = (el) => {{
                const heading = el.querySelector('h1, h2, h3, [class*=title]');
                return [
                    el.getAttribute('aria-label'),
                    el.getAttribute('title'),
                    el.getAttribute('placeholder'),
                    el.getAttribute('name'),
                    heading ? heading.innerText : null,
                    el.innerText || el.value || '',
                ].filter((t) => typeof t === 'string' && t.length > 0);
            }};
            const found = Array.from(document.querySelectorAll({css}))
                .find((el) => (!visibleOnly || visible(el)) && names(el).some(test));
            return found ? tag(found) : null;
        }})()"#,
        tag_fn = TAG_FN,
        matcher = matcher,
        visible_only = visible_only,
        css = json!(role_css(selector.role)),
    )
}

fn locate_all_script(role: Role) -> String {
    format!(
        r#"(() => {{
            {tag_fn}
            return Array.from(document.querySelectorAll({css})).filter(visible).map(tag);
        }})()"#,
        tag_fn = TAG_FN,
        css = json!(role_css(role)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_script_embeds_escaped_title_and_role_css() {
        let selector = Selector::exact(Role::Edit, "请输入erpsku、sellersku、asin、关键词或站点名进行搜索");
        let script = locate_script(&selector, true);
        assert!(script.contains("\"kind\":\"exact\""));
        assert!(script.contains("请输入erpsku"));
        assert!(script.contains("const visibleOnly = true;"));
        assert!(script.contains("textarea"));
    }

    #[test]
    fn locate_script_escapes_quotes_in_titles() {
        let selector = Selector::exact(Role::Button, "it's \"quoted\"");
        let script = locate_script(&selector, false);
        assert!(script.contains(r#"it's \"quoted\""#));
    }

    #[test]
    fn pattern_selectors_become_regexps() {
        let selector = Selector::pattern(Role::Dialog, "保存文件|Save As|Save File");
        let script = locate_script(&selector, true);
        assert!(script.contains("\"kind\":\"pattern\""));
        assert!(script.contains("[role=dialog]"));
    }

    #[test]
    fn actions_reference_the_handle_attribute() {
        let script = action_script(&Handle("42".to_string()), "el.click();");
        assert!(script.contains("data-automation-handle"));
        assert!(script.contains("\"42\""));
        assert!(script.contains("if (!el) return false;"));
    }
}
