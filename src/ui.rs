use crate::models::UserId;

pub fn render_index(user_id: UserId) -> String {
    INDEX_HTML.replace("{{USER_ID}}", &user_id.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Daily Tasks</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #26302f;
      --muted: #66706e;
      --accent: #2f7d6d;
      --danger: #c2413a;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 18px 44px rgba(38, 48, 47, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #e3ece7);
      color: var(--ink);
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 40px 16px;
    }

    main {
      width: min(640px, 100%);
      background: var(--card);
      border-radius: 22px;
      box-shadow: var(--shadow);
      padding: 30px;
      display: grid;
      gap: 20px;
    }

    h1 {
      margin: 0;
      font-size: 1.9rem;
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
    }

    .badge {
      display: inline-block;
      margin-top: 8px;
      padding: 3px 10px;
      border-radius: 999px;
      background: #dcefe9;
      color: var(--accent);
      font-size: 0.85rem;
    }

    ul {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    li label {
      display: grid;
      grid-template-columns: auto 1fr;
      gap: 12px;
      align-items: start;
      padding: 12px 14px;
      border-radius: 14px;
      background: #fff;
      border: 1px solid #e2e6e4;
      cursor: pointer;
    }

    .title {
      font-weight: 600;
    }

    .meta {
      color: var(--muted);
      font-size: 0.9rem;
    }

    .empty {
      color: var(--muted);
      text-align: center;
    }

    button {
      border: none;
      border-radius: 14px;
      padding: 14px;
      font-size: 1rem;
      font-weight: 600;
      color: #fff;
      background: var(--accent);
      cursor: pointer;
    }

    button:disabled {
      opacity: 0.55;
      cursor: progress;
    }

    button.idle {
      background: var(--muted);
    }

    .toast {
      position: fixed;
      left: 50%;
      bottom: 24px;
      transform: translateX(-50%);
      padding: 12px 20px;
      border-radius: 12px;
      color: #fff;
      opacity: 0;
      transition: opacity 200ms ease;
    }

    .toast.show {
      opacity: 1;
    }

    .toast.success {
      background: var(--accent);
    }

    .toast.error {
      background: var(--danger);
    }
  </style>
</head>
<body>
  <main>
    <header>
      <h1>Today's tasks</h1>
      <p class="subtitle" id="date"></p>
      <span class="badge" id="submitted" hidden>Submitted today</span>
    </header>

    <ul id="tasks"></ul>

    <button id="submit-btn" type="button">Submit</button>
  </main>

  <div class="toast" id="toast" role="status"></div>

  <script>
    const base = '/api/users/{{USER_ID}}';
    const list = document.getElementById('tasks');
    const submitBtn = document.getElementById('submit-btn');
    const toast = document.getElementById('toast');
    let draft = {};

    const notify = (notification) => {
      if (!notification) {
        return;
      }
      toast.textContent = notification.message;
      toast.className = `toast show ${notification.level}`;
      setTimeout(() => {
        toast.className = 'toast';
      }, notification.durationMs);
    };

    const refreshButton = () => {
      const anyChecked = Object.values(draft).some((value) => value === true);
      submitBtn.classList.toggle('idle', !anyChecked);
    };

    const saveDraft = async () => {
      await fetch(`${base}/draft`, {
        method: 'PUT',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(draft)
      });
    };

    const renderTasks = (tasks) => {
      list.innerHTML = '';
      if (tasks.length === 0) {
        list.innerHTML = '<li class="empty">No tasks assigned.</li>';
        return;
      }
      tasks.forEach((task) => {
        const key = `task_${task.taskId}`;
        const item = document.createElement('li');
        const label = document.createElement('label');
        const box = document.createElement('input');
        box.type = 'checkbox';
        box.checked = draft[key] === true;
        box.addEventListener('change', () => {
          draft = { ...draft, [key]: box.checked };
          refreshButton();
          saveDraft().catch(() => {});
        });
        const text = document.createElement('div');
        const title = document.createElement('div');
        title.className = 'title';
        title.textContent = task.title;
        const meta = document.createElement('div');
        meta.className = 'meta';
        meta.textContent = `${task.category.categoryName} · ${task.description}`;
        text.append(title, meta);
        label.append(box, text);
        item.append(label);
        list.append(item);
      });
    };

    const loadToday = async () => {
      const res = await fetch(`${base}/today`);
      if (!res.ok) {
        throw new Error('Unable to load tasks');
      }
      const today = await res.json();
      draft = today.draft;
      document.getElementById('date').textContent = today.date;
      document.getElementById('submitted').hidden = !today.submitted;
      submitBtn.disabled = !today.canSubmit;
      renderTasks(today.tasks);
      refreshButton();
    };

    const post = async (path, body) => {
      const res = await fetch(`${base}${path}`, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: body === undefined ? undefined : JSON.stringify(body)
      });
      if (res.status === 409) {
        throw new Error(await res.text());
      }
      return res.json();
    };

    const handle = async (result) => {
      if (result.outcome === 'confirmation_required') {
        const proceed = window.confirm(result.message);
        return handle(await post('/submit/confirm', { proceed }));
      }
      notify(result.notification);
      if (result.outcome === 'submitted') {
        document.getElementById('submitted').hidden = false;
      }
    };

    submitBtn.addEventListener('click', async () => {
      submitBtn.disabled = true;
      try {
        await handle(await post('/submit'));
      } catch (err) {
        notify({ level: 'error', message: err.message, durationMs: 3000 });
      } finally {
        submitBtn.disabled = false;
      }
    });

    loadToday().catch((err) => notify({ level: 'error', message: err.message, durationMs: 3000 }));
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_targets_the_requested_user() {
        let page = render_index(42);
        assert!(page.contains("'/api/users/42'"));
        assert!(!page.contains("{{USER_ID}}"));
    }
}
