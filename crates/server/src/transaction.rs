//! 事务处理辅助宏
//!
//! 证书写入与审计记录需要落在同一个事务里。

/// 在一个数据库事务中执行 `$body`。
///
/// * `$db` - 数据库连接引用
/// * `$txn` - 事务参数名称
/// * `$body` - 事务体，返回 `Result<T, CertError>`
///
/// 返回 `Result<T, TransactionError<CertError>>`，可用 `?` 转成 `CertError`。
///
/// ```ignore
/// let model = txn!(&self.db, |txn| {
///     let model = active.insert(txn).await?;
///     add_audit(txn, actor, "certificate.create", Some(model.id), diff).await?;
///     Ok::<_, CertError>(model)
/// })?;
/// ```
#[macro_export]
macro_rules! txn {
    ($db:expr, |$txn:ident| $body:expr) => {{
        use sea_orm::TransactionTrait;
        $db.transaction(|$txn| Box::pin(async move { $body })).await
    }};
}
