//! 商品页面
//!
//! 列表页、新增表单和编辑表单。所有用户数据在输出前转义。

use std::fmt::Write;

use axum::response::Html;

use super::model::Item;

const STYLESHEET: &str = "/css/style.css";

/// 转义 HTML 特殊字符
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <link rel="stylesheet" href="{STYLESHEET}">
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_html(title),
    ))
}

/// 列表页
pub fn index(items: &[Item]) -> Html<String> {
    let mut rows = String::new();
    for item in items {
        let _ = write!(
            rows,
            r#"    <tr>
      <td>{id}</td>
      <td>{name}</td>
      <td>{description}</td>
      <td>
        <a href="/editar/{id}">Editar</a>
        <form action="/deletar/{id}" method="POST" style="display:inline">
          <button type="submit">Deletar</button>
        </form>
      </td>
    </tr>
"#,
            id = item.id,
            name = escape_html(&item.name),
            description = escape_html(&item.description),
        );
    }

    let body = format!(
        r#"<h1>Itens</h1>
<p>
  <a href="/cadastro">Cadastrar item</a>
  <a href="/relatorio">Baixar relatório</a>
</p>
<table>
  <thead>
    <tr><th>ID</th><th>Nome</th><th>Descrição</th><th>Ações</th></tr>
  </thead>
  <tbody>
{rows}  </tbody>
</table>"#
    );

    page("Itens", &body)
}

/// 新增表单
pub fn create_form() -> Html<String> {
    page("Cadastro", &item_form("Cadastrar item", "/cadastro", "", ""))
}

/// 编辑表单
pub fn edit_form(item: &Item) -> Html<String> {
    let action = format!("/editar/{}", item.id);
    page(
        "Editar",
        &item_form("Editar item", &action, &item.name, &item.description),
    )
}

fn item_form(heading: &str, action: &str, name: &str, description: &str) -> String {
    format!(
        r#"<h1>{heading}</h1>
<form action="{action}" method="POST">
  <label for="nome">Nome</label>
  <input type="text" id="nome" name="nome" value="{name}">
  <label for="descricao">Descrição</label>
  <textarea id="descricao" name="descricao">{description}</textarea>
  <button type="submit">Salvar</button>
</form>
<a href="/">Voltar</a>"#,
        heading = escape_html(heading),
        action = escape_html(action),
        name = escape_html(name),
        description = escape_html(description),
    )
}
