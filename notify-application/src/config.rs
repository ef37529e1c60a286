/// 排空阶段配置
#[derive(Clone, Copy, Debug)]
pub struct DrainConfig {
    /// 单事件的投递并发（同一事件匹配到多条策略）
    pub dispatch_concurrency: usize,
    /// 请求失败时是否仍然通知（默认只在成功或强制通知时投递）
    pub notify_on_failure: bool,
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self {
            dispatch_concurrency: 8,
            notify_on_failure: false,
        }
    }
}
